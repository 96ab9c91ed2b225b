//! BACnet/IP implementation of the stack contract.
//!
//! Serves Who-Is and ReadProperty for the device object and its analog
//! input. Anything else confirmed is rejected; other traffic is ignored.

use super::properties::{read_property, resolve_object_id};
use super::{ProtocolStack, StackApplication};
use crate::{DeviceIdentity, NetworkBinding, SharedPoint, StackError};
use bacsim_core::apdu::{
    ApduType, ConfirmedRequestHeader, ErrorPdu, RejectPdu, UnconfirmedRequestHeader,
};
use bacsim_core::encoding::{reader::Reader, writer::Writer};
use bacsim_core::npdu::Npdu;
use bacsim_core::services::i_am::IAmRequest;
use bacsim_core::services::read_property::{
    ReadPropertyAck, ReadPropertyRequest, SERVICE_READ_PROPERTY,
};
use bacsim_core::services::who_is::{WhoIsRequest, SERVICE_WHO_IS};
use bacsim_core::types::{ObjectId, RejectReason};
use bacsim_datalink::{BacnetIpTransport, DataLink, DataLinkAddress, DataLinkError};
use std::io;
use tokio::sync::watch;

const MAX_FRAME_LEN: usize = 1500;

/// Device object as registered with the stack.
#[derive(Debug, Clone)]
pub struct LocalDevice {
    identity: DeviceIdentity,
}

impl LocalDevice {
    pub fn new(identity: DeviceIdentity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }
}

/// Analog-input object backed by the shared simulated point.
#[derive(Debug, Clone)]
pub struct AnalogInputObject {
    point: SharedPoint,
}

impl AnalogInputObject {
    pub fn new(point: SharedPoint) -> Self {
        Self { point }
    }

    pub fn point(&self) -> &SharedPoint {
        &self.point
    }

    pub fn object_id(&self) -> ObjectId {
        self.point.object_id()
    }
}

/// Binds a [`BacnetIpTransport`] to the chosen address.
#[derive(Debug, Clone, Copy, Default)]
pub struct BipStack;

impl ProtocolStack for BipStack {
    type Device = LocalDevice;
    type Object = AnalogInputObject;
    type Application = BipApplication<BacnetIpTransport>;

    fn create_local_device(&self, identity: &DeviceIdentity) -> LocalDevice {
        LocalDevice::new(identity.clone())
    }

    fn create_analog_input_object(&self, point: SharedPoint) -> AnalogInputObject {
        AnalogInputObject::new(point)
    }

    async fn bind_application(
        &self,
        device: LocalDevice,
        objects: Vec<AnalogInputObject>,
        binding: NetworkBinding,
    ) -> Result<Self::Application, StackError> {
        let transport = match binding.broadcast {
            Some(broadcast) => {
                BacnetIpTransport::bind_with_broadcast(binding.socket_addr(), broadcast).await?
            }
            None => BacnetIpTransport::bind(binding.socket_addr()).await?,
        };
        log::info!(
            "device {} bound to {}",
            device.identity().instance(),
            transport.local_addr()?
        );
        Ok(BipApplication::new(device, objects, transport))
    }
}

/// A device application serving requests arriving on `D`.
pub struct BipApplication<D: DataLink> {
    device: LocalDevice,
    objects: Vec<AnalogInputObject>,
    datalink: D,
    discovery: bool,
}

impl<D: DataLink> BipApplication<D> {
    pub fn new(device: LocalDevice, objects: Vec<AnalogInputObject>, datalink: D) -> Self {
        Self {
            device,
            objects,
            datalink,
            discovery: false,
        }
    }

    pub fn datalink(&self) -> &D {
        &self.datalink
    }

    async fn handle_frame(&self, frame: &[u8], source: DataLinkAddress) -> Result<(), StackError> {
        let mut r = Reader::new(frame);
        let npdu = Npdu::decode(&mut r)?;
        if npdu.is_network_message() || r.is_empty() {
            return Ok(());
        }

        match ApduType::from_first_octet(r.peek_u8()?) {
            Some(ApduType::UnconfirmedRequest) => {
                let header = UnconfirmedRequestHeader::decode(&mut r)?;
                if header.service_choice == SERVICE_WHO_IS {
                    let request = WhoIsRequest::decode_after_header(&mut r)?;
                    self.handle_who_is(request, &npdu, source).await?;
                }
            }
            Some(ApduType::ConfirmedRequest) => {
                let header = ConfirmedRequestHeader::decode(&mut r)?;
                if header.segmented {
                    log::debug!("ignoring segmented request from {source}");
                    return Ok(());
                }
                match header.service_choice {
                    SERVICE_READ_PROPERTY => {
                        match ReadPropertyRequest::decode_after_header(&mut r, header.invoke_id) {
                            Ok(request) => {
                                self.handle_read_property(request, &npdu, source).await?
                            }
                            Err(err) => {
                                let reason = if err.is_truncation() {
                                    RejectReason::MissingRequiredParameter
                                } else {
                                    RejectReason::InvalidTag
                                };
                                self.send_reject(header.invoke_id, reason, &npdu, source)
                                    .await?;
                            }
                        }
                    }
                    other => {
                        log::debug!("rejecting confirmed service {other} from {source}");
                        self.send_reject(
                            header.invoke_id,
                            RejectReason::UnrecognizedService,
                            &npdu,
                            source,
                        )
                        .await?;
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }

    async fn handle_who_is(
        &self,
        request: WhoIsRequest,
        npdu: &Npdu,
        source: DataLinkAddress,
    ) -> Result<(), StackError> {
        let identity = self.device.identity();
        if !self.discovery || !request.matches(identity.instance()) {
            return Ok(());
        }
        log::debug!("answering who-is from {source}");

        let i_am = IAmRequest {
            device_id: identity.object_id(),
            max_apdu: identity.max_apdu,
            segmentation: identity.segmentation,
            vendor_id: identity.vendor_id,
        };
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        npdu.reply().encode(&mut w)?;
        i_am.encode(&mut w)?;
        self.datalink.send(source, w.as_written()).await?;
        Ok(())
    }

    async fn handle_read_property(
        &self,
        request: ReadPropertyRequest,
        npdu: &Npdu,
        source: DataLinkAddress,
    ) -> Result<(), StackError> {
        let mut buf = [0u8; MAX_FRAME_LEN];
        let mut w = Writer::new(&mut buf);
        npdu.reply().encode(&mut w)?;
        let object_id = resolve_object_id(&self.device, request.object_id);

        match read_property(
            &self.device,
            &self.objects,
            object_id,
            request.property_id,
            request.array_index,
        ) {
            Ok(values) => {
                ReadPropertyAck {
                    invoke_id: request.invoke_id,
                    object_id,
                    property_id: request.property_id,
                    array_index: request.array_index,
                    values: &values,
                }
                .encode(&mut w)?;
            }
            Err(err) => {
                log::debug!(
                    "read-property {:?} of {:?} failed: {err:?}",
                    request.property_id,
                    request.object_id
                );
                let (class, code) = err.class_and_code();
                ErrorPdu::new(request.invoke_id, SERVICE_READ_PROPERTY, class, code)
                    .encode(&mut w)?;
            }
        }

        self.datalink.send(source, w.as_written()).await?;
        Ok(())
    }

    async fn send_reject(
        &self,
        invoke_id: u8,
        reason: RejectReason,
        npdu: &Npdu,
        source: DataLinkAddress,
    ) -> Result<(), StackError> {
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        npdu.reply().encode(&mut w)?;
        RejectPdu::new(invoke_id, reason).encode(&mut w)?;
        self.datalink.send(source, w.as_written()).await?;
        Ok(())
    }
}

impl<D: DataLink> StackApplication for BipApplication<D> {
    fn enable_discovery_responder(&mut self) {
        self.discovery = true;
    }

    async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), StackError> {
        let mut buf = [0u8; MAX_FRAME_LEN];
        loop {
            if *shutdown.borrow() {
                return Ok(());
            }

            let received = tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        return Ok(());
                    }
                    continue;
                }
                received = self.datalink.recv(&mut buf) => received,
            };

            match received {
                Ok((n, source)) => {
                    if let Err(e) = self.handle_frame(&buf[..n], source).await {
                        log::debug!("dropping frame from {source}: {e}");
                    }
                }
                Err(e) if e.is_frame_local() => log::debug!("dropping frame: {e}"),
                // Windows reports an ICMP port-unreachable for an earlier
                // reply as a reset on the next receive.
                Err(DataLinkError::Io(e)) if e.kind() == io::ErrorKind::ConnectionReset => {
                    log::debug!("peer went away: {e}");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
