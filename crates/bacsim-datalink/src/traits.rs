use crate::DataLinkAddress;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataLinkError {
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),
    #[error("NPDU exceeds the BACnet/IP frame limit")]
    FrameTooLarge,
    #[error("malformed BVLC frame")]
    InvalidFrame,
    #[error("BVLC function 0x{0:02x} is not served by a plain device")]
    UnsupportedBvlcFunction(u8),
}

impl DataLinkError {
    /// Whether the error concerns a single frame rather than the link itself.
    pub fn is_frame_local(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

/// Exchange of whole NPDUs with peers on one BACnet data link. Link framing
/// stays inside the implementation.
pub trait DataLink: Send + Sync {
    async fn send(&self, address: DataLinkAddress, npdu: &[u8]) -> Result<(), DataLinkError>;

    /// Waits for the next NPDU, copies it into `buf` and reports its origin.
    async fn recv(&self, buf: &mut [u8]) -> Result<(usize, DataLinkAddress), DataLinkError>;
}
