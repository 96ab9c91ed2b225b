use crate::apdu::UnconfirmedRequestHeader;
use crate::encoding::{
    primitives::{decode_ctx_unsigned, encode_ctx_unsigned},
    reader::Reader,
    writer::Writer,
};
use crate::{DecodeError, EncodeError};

pub const SERVICE_WHO_IS: u8 = 0x08;

/// Who-Is request with optional inclusive instance limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhoIsRequest {
    pub low_limit: Option<u32>,
    pub high_limit: Option<u32>,
}

impl WhoIsRequest {
    pub const fn global() -> Self {
        Self {
            low_limit: None,
            high_limit: None,
        }
    }

    pub const fn range(low: u32, high: u32) -> Self {
        Self {
            low_limit: Some(low),
            high_limit: Some(high),
        }
    }

    /// Whether a device with `instance` must answer this request.
    pub fn matches(&self, instance: u32) -> bool {
        match (self.low_limit, self.high_limit) {
            (Some(low), Some(high)) => (low..=high).contains(&instance),
            _ => true,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        UnconfirmedRequestHeader {
            service_choice: SERVICE_WHO_IS,
        }
        .encode(w)?;
        if let (Some(low), Some(high)) = (self.low_limit, self.high_limit) {
            encode_ctx_unsigned(w, 0, low)?;
            encode_ctx_unsigned(w, 1, high)?;
        }
        Ok(())
    }

    /// Decodes the service payload. Limits are either both present or both absent.
    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if r.is_empty() {
            return Ok(Self::global());
        }
        let low = decode_ctx_unsigned(r, 0)?;
        let high = decode_ctx_unsigned(r, 1)?;
        Ok(Self::range(low, high))
    }
}
