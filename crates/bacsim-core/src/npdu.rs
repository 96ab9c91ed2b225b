use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

/// BACnet network layer protocol version (always `0x01`).
pub const NPDU_VERSION: u8 = 0x01;

const CONTROL_NETWORK_MESSAGE: u8 = 0x80;
const CONTROL_DESTINATION: u8 = 0x20;
const CONTROL_SOURCE: u8 = 0x08;
const CONTROL_EXPECTING_REPLY: u8 = 0x04;

/// A remote network number plus MAC address, as carried in DNET/DADR or SNET/SADR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NpduAddress {
    pub network: u16,
    pub mac: [u8; 6],
    pub mac_len: u8,
}

/// Network layer header preceding every APDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Npdu {
    pub control: u8,
    pub destination: Option<NpduAddress>,
    pub source: Option<NpduAddress>,
    pub hop_count: Option<u8>,
    pub message_type: Option<u8>,
}

impl Npdu {
    pub const fn new(control: u8) -> Self {
        Self {
            control,
            destination: None,
            source: None,
            hop_count: None,
            message_type: None,
        }
    }

    /// Header for a reply to a request that carried this header. Requests that
    /// arrived through a router name their origin in SNET/SADR; the reply is
    /// addressed back to it.
    pub fn reply(&self) -> Self {
        let mut out = Self::new(0);
        if let Some(origin) = self.source {
            out.control |= CONTROL_DESTINATION;
            out.destination = Some(origin);
            out.hop_count = Some(255);
        }
        out
    }

    pub const fn is_network_message(&self) -> bool {
        self.control & CONTROL_NETWORK_MESSAGE != 0
    }

    pub const fn expects_reply(&self) -> bool {
        self.control & CONTROL_EXPECTING_REPLY != 0
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(NPDU_VERSION)?;
        w.write_u8(self.control)?;
        if let Some(dest) = self.destination {
            encode_addr(w, dest)?;
        }
        if let Some(src) = self.source {
            encode_addr(w, src)?;
        }
        if self.destination.is_some() {
            w.write_u8(self.hop_count.unwrap_or(255))?;
        }
        if self.is_network_message() {
            w.write_u8(self.message_type.unwrap_or(0))?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if r.read_u8()? != NPDU_VERSION {
            return Err(DecodeError::InvalidValue);
        }
        let control = r.read_u8()?;

        let destination = (control & CONTROL_DESTINATION != 0)
            .then(|| decode_addr(r))
            .transpose()?;
        let source = (control & CONTROL_SOURCE != 0)
            .then(|| decode_addr(r))
            .transpose()?;
        let hop_count = destination.map(|_| r.read_u8()).transpose()?;

        let message_type = if control & CONTROL_NETWORK_MESSAGE != 0 {
            let mt = r.read_u8()?;
            if mt >= 0x80 {
                // Proprietary network messages carry a vendor id we do not use.
                r.read_be_u16()?;
            }
            Some(mt)
        } else {
            None
        };

        Ok(Self {
            control,
            destination,
            source,
            hop_count,
            message_type,
        })
    }
}

fn encode_addr(w: &mut Writer<'_>, addr: NpduAddress) -> Result<(), EncodeError> {
    let mac = addr
        .mac
        .get(..addr.mac_len as usize)
        .ok_or(EncodeError::ValueOutOfRange)?;
    w.write_be_u16(addr.network)?;
    w.write_u8(addr.mac_len)?;
    w.write_all(mac)
}

fn decode_addr(r: &mut Reader<'_>) -> Result<NpduAddress, DecodeError> {
    let network = r.read_be_u16()?;
    let mac_len = r.read_u8()?;
    if mac_len > 6 {
        return Err(DecodeError::InvalidLength);
    }
    let mut mac = [0u8; 6];
    mac[..mac_len as usize].copy_from_slice(r.read_exact(mac_len as usize)?);
    Ok(NpduAddress {
        network,
        mac,
        mac_len,
    })
}
