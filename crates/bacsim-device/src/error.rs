use crate::service::ServiceState;
use bacsim_datalink::DataLinkError;
use thiserror::Error;

/// Failures raised by a protocol stack while binding or serving.
#[derive(Debug, Error)]
pub enum StackError {
    #[error("datalink error: {0}")]
    DataLink(#[from] DataLinkError),
    #[error("encode error: {0}")]
    Encode(#[from] bacsim_core::EncodeError),
    #[error("decode error: {0}")]
    Decode(#[from] bacsim_core::DecodeError),
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("no usable IPv4 address found on any local interface")]
    NoInterface,
    #[error("could not enumerate network interfaces: {0}")]
    InterfaceEnumeration(#[source] std::io::Error),
    #[error("invalid selection {input:?}: expected an index in 0..{len}")]
    InvalidSelection { input: String, len: usize },
    #[error("invalid device identity: {0}")]
    InvalidIdentity(&'static str),
    #[error("device already has its data point attached")]
    AlreadyAttached,
    #[error("device has no data point attached")]
    NotAttached,
    #[error("operation not allowed while the service is {state:?}")]
    InvalidState { state: ServiceState },
    #[error("protocol stack error: {0}")]
    Stack(#[from] StackError),
}
