use crate::bip::bvlc::{BvlcFunction, BvlcHeader, BVLC_HEADER_LEN};
use crate::{DataLink, DataLinkAddress, DataLinkError};
use bacsim_core::encoding::{reader::Reader, writer::Writer};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::UdpSocket;

const MAX_BIP_FRAME_LEN: usize = 1600;

/// BACnet/IP (Annex J) transport over UDP.
///
/// A socket bound to a unicast interface address does not see subnet
/// broadcasts, so the transport can own a second socket bound to the
/// subnet's broadcast address on the same port. Frames arriving on either
/// socket are surfaced through [`DataLink::recv`]; all sends leave through
/// the unicast socket.
#[derive(Debug, Clone)]
pub struct BacnetIpTransport {
    socket: Arc<UdpSocket>,
    broadcast: Option<Arc<UdpSocket>>,
}

impl BacnetIpTransport {
    pub async fn bind(bind_addr: SocketAddr) -> Result<Self, DataLinkError> {
        let socket = UdpSocket::bind(bind_addr).await?;
        socket.set_broadcast(true)?;
        log::debug!("bacnet/ip socket bound to {}", socket.local_addr()?);
        Ok(Self {
            socket: Arc::new(socket),
            broadcast: None,
        })
    }

    /// Binds the unicast socket and a broadcast listener at
    /// `broadcast_listen` on the same port.
    ///
    /// A listener that cannot be bound is logged and skipped; the device is
    /// then reachable by unicast only.
    pub async fn bind_with_broadcast(
        bind_addr: SocketAddr,
        broadcast_listen: Ipv4Addr,
    ) -> Result<Self, DataLinkError> {
        let mut transport = Self::bind(bind_addr).await?;
        let port = transport.local_addr()?.port();
        let listen = SocketAddr::new(IpAddr::V4(broadcast_listen), port);
        match UdpSocket::bind(listen).await {
            Ok(socket) => {
                log::debug!("bacnet/ip broadcast listener bound to {listen}");
                transport.broadcast = Some(Arc::new(socket));
            }
            Err(err) => {
                log::warn!("could not listen for broadcasts on {listen}: {err}");
            }
        }
        Ok(transport)
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DataLinkError> {
        self.socket.local_addr().map_err(DataLinkError::Io)
    }

    pub fn broadcast_listen_addr(&self) -> Option<SocketAddr> {
        self.broadcast
            .as_ref()
            .and_then(|socket| socket.local_addr().ok())
    }

    fn is_broadcast_target(&self, addr: SocketAddr) -> bool {
        match addr.ip() {
            IpAddr::V4(v4) if v4.is_broadcast() => true,
            ip => self
                .broadcast_listen_addr()
                .is_some_and(|listen| listen.ip() == ip),
        }
    }

    fn unwrap_frame(
        frame: &[u8],
        src: SocketAddr,
        buf: &mut [u8],
    ) -> Result<(usize, DataLinkAddress), DataLinkError> {
        let mut r = Reader::new(frame);
        let hdr = BvlcHeader::decode(&mut r).map_err(|_| DataLinkError::InvalidFrame)?;
        let body = r
            .read_exact(hdr.payload_len())
            .map_err(|_| DataLinkError::InvalidFrame)?;

        let (payload, origin) = match hdr.function {
            BvlcFunction::OriginalUnicastNpdu
            | BvlcFunction::OriginalBroadcastNpdu
            | BvlcFunction::DistributeBroadcastToNetwork => (body, src),
            BvlcFunction::ForwardedNpdu => {
                if body.len() < 6 {
                    return Err(DataLinkError::InvalidFrame);
                }
                let ip = Ipv4Addr::new(body[0], body[1], body[2], body[3]);
                let port = u16::from_be_bytes([body[4], body[5]]);
                (&body[6..], SocketAddr::new(IpAddr::V4(ip), port))
            }
            BvlcFunction::Result => return Err(DataLinkError::InvalidFrame),
            BvlcFunction::Other(v) => return Err(DataLinkError::UnsupportedBvlcFunction(v)),
        };

        if payload.len() > buf.len() {
            return Err(DataLinkError::FrameTooLarge);
        }
        buf[..payload.len()].copy_from_slice(payload);
        Ok((payload.len(), origin.into()))
    }
}

impl DataLink for BacnetIpTransport {
    async fn send(&self, address: DataLinkAddress, payload: &[u8]) -> Result<(), DataLinkError> {
        let addr = address.as_socket_addr();
        let function = if self.is_broadcast_target(addr) {
            BvlcFunction::OriginalBroadcastNpdu
        } else {
            BvlcFunction::OriginalUnicastNpdu
        };

        let mut frame = [0u8; MAX_BIP_FRAME_LEN];
        let total_len = BVLC_HEADER_LEN
            .checked_add(payload.len())
            .ok_or(DataLinkError::FrameTooLarge)?;
        if total_len > frame.len() {
            return Err(DataLinkError::FrameTooLarge);
        }

        let mut w = Writer::new(&mut frame);
        BvlcHeader {
            function,
            length: total_len as u16,
        }
        .encode(&mut w)
        .map_err(|_| DataLinkError::InvalidFrame)?;
        w.write_all(payload)
            .map_err(|_| DataLinkError::FrameTooLarge)?;

        self.socket.send_to(w.as_written(), addr).await?;
        Ok(())
    }

    async fn recv(&self, buf: &mut [u8]) -> Result<(usize, DataLinkAddress), DataLinkError> {
        let mut unicast = [0u8; MAX_BIP_FRAME_LEN];
        let Some(broadcast) = self.broadcast.as_ref() else {
            let (n, src) = self.socket.recv_from(&mut unicast).await?;
            return Self::unwrap_frame(&unicast[..n], src, buf);
        };

        let mut flooded = [0u8; MAX_BIP_FRAME_LEN];
        let (n, src, via_broadcast) = tokio::select! {
            res = self.socket.recv_from(&mut unicast) => {
                let (n, src) = res?;
                (n, src, false)
            }
            res = broadcast.recv_from(&mut flooded) => {
                let (n, src) = res?;
                (n, src, true)
            }
        };
        let frame = if via_broadcast {
            &flooded[..n]
        } else {
            &unicast[..n]
        };
        Self::unwrap_frame(frame, src, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::BacnetIpTransport;
    use crate::bip::bvlc::{BvlcFunction, BvlcHeader};
    use crate::{DataLink, DataLinkAddress, DataLinkError};
    use bacsim_core::encoding::writer::Writer;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use tokio::net::UdpSocket;
    use tokio::time::{timeout, Duration};

    fn localhost(port: u16) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port)
    }

    #[tokio::test]
    async fn send_wraps_payload_in_original_unicast() {
        let transport = BacnetIpTransport::bind(localhost(0)).await.unwrap();
        let peer = UdpSocket::bind(localhost(0)).await.unwrap();
        let peer_addr = peer.local_addr().unwrap();

        transport
            .send(DataLinkAddress::Ip(peer_addr), &[0x01, 0x00, 0x10, 0x08])
            .await
            .unwrap();

        let mut rx = [0u8; 32];
        let (n, src) = timeout(Duration::from_secs(1), peer.recv_from(&mut rx))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&rx[..n], &[0x81, 0x0A, 0x00, 0x08, 0x01, 0x00, 0x10, 0x08]);
        assert_eq!(src, transport.local_addr().unwrap());
    }

    #[tokio::test]
    async fn recv_unwraps_original_broadcast() {
        let transport = BacnetIpTransport::bind(localhost(0)).await.unwrap();
        let target = transport.local_addr().unwrap();
        let sender = UdpSocket::bind(localhost(0)).await.unwrap();

        sender
            .send_to(&[0x81, 0x0B, 0x00, 0x08, 0x01, 0x00, 0x10, 0x08], target)
            .await
            .unwrap();

        let mut out = [0u8; 16];
        let (n, src) = transport.recv(&mut out).await.unwrap();
        assert_eq!(&out[..n], &[0x01, 0x00, 0x10, 0x08]);
        assert_eq!(src, DataLinkAddress::Ip(sender.local_addr().unwrap()));
    }

    #[tokio::test]
    async fn recv_forwarded_npdu_returns_forwarded_origin() {
        let transport = BacnetIpTransport::bind(localhost(0)).await.unwrap();
        let target = transport.local_addr().unwrap();
        let sender = UdpSocket::bind(localhost(0)).await.unwrap();

        let mut frame = [0u8; 64];
        let mut w = Writer::new(&mut frame);
        BvlcHeader {
            function: BvlcFunction::ForwardedNpdu,
            length: 4 + 6 + 3,
        }
        .encode(&mut w)
        .unwrap();
        w.write_all(&[10, 1, 2, 3]).unwrap();
        w.write_be_u16(47808).unwrap();
        w.write_all(&[1, 2, 3]).unwrap();
        sender.send_to(w.as_written(), target).await.unwrap();

        let mut out = [0u8; 16];
        let (n, src) = transport.recv(&mut out).await.unwrap();
        assert_eq!(&out[..n], &[1, 2, 3]);
        assert_eq!(
            src,
            DataLinkAddress::Ip(SocketAddr::new(
                IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)),
                47808
            ))
        );
    }

    #[tokio::test]
    async fn recv_rejects_bbmd_management() {
        let transport = BacnetIpTransport::bind(localhost(0)).await.unwrap();
        let target = transport.local_addr().unwrap();
        let sender = UdpSocket::bind(localhost(0)).await.unwrap();

        sender
            .send_to(&[0x81, 0x05, 0x00, 0x06, 0x00, 0x3C], target)
            .await
            .unwrap();

        let mut out = [0u8; 16];
        let err = transport.recv(&mut out).await.unwrap_err();
        assert!(matches!(err, DataLinkError::UnsupportedBvlcFunction(0x05)));
    }

    #[tokio::test]
    async fn recv_rejects_truncated_frame() {
        let transport = BacnetIpTransport::bind(localhost(0)).await.unwrap();
        let target = transport.local_addr().unwrap();
        let sender = UdpSocket::bind(localhost(0)).await.unwrap();

        sender
            .send_to(&[0x81, 0x0A, 0x00, 0x10, 0x01], target)
            .await
            .unwrap();

        let mut out = [0u8; 16];
        let err = transport.recv(&mut out).await.unwrap_err();
        assert!(matches!(err, DataLinkError::InvalidFrame));
    }

    #[tokio::test]
    async fn broadcast_listener_feeds_recv() {
        let listen = Ipv4Addr::new(127, 0, 0, 2);
        let transport = BacnetIpTransport::bind_with_broadcast(localhost(0), listen)
            .await
            .unwrap();
        let port = transport.local_addr().unwrap().port();
        let Some(listener) = transport.broadcast_listen_addr() else {
            // Loopback aliases are not available on every host.
            return;
        };
        assert_eq!(listener, SocketAddr::new(IpAddr::V4(listen), port));

        let sender = UdpSocket::bind(localhost(0)).await.unwrap();
        sender
            .send_to(&[0x81, 0x0B, 0x00, 0x06, 0xAA, 0xBB], listener)
            .await
            .unwrap();

        let mut out = [0u8; 16];
        let (n, _) = timeout(Duration::from_secs(1), transport.recv(&mut out))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&out[..n], &[0xAA, 0xBB]);
    }
}
