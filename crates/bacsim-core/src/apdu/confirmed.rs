use crate::apdu::ApduType;
use crate::encoding::{
    primitives::{decode_app_enumerated, encode_app_enumerated},
    reader::Reader,
    writer::Writer,
};
use crate::types::{ErrorClass, ErrorCode, RejectReason};
use crate::{DecodeError, EncodeError};

const PDU_FLAG_SEGMENTED: u8 = 0b0000_1000;
const PDU_FLAG_MORE_FOLLOWS: u8 = 0b0000_0100;
const PDU_FLAG_SEGMENTED_RESPONSE_ACCEPTED: u8 = 0b0000_0010;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedRequestHeader {
    pub segmented: bool,
    pub more_follows: bool,
    pub segmented_response_accepted: bool,
    pub max_segments: u8,
    pub max_apdu: u8,
    pub invoke_id: u8,
    pub sequence_number: Option<u8>,
    pub proposed_window_size: Option<u8>,
    pub service_choice: u8,
}

impl ConfirmedRequestHeader {
    /// Header for a single-segment request of `service_choice`.
    pub const fn unsegmented(invoke_id: u8, service_choice: u8) -> Self {
        Self {
            segmented: false,
            more_follows: false,
            segmented_response_accepted: false,
            max_segments: 0,
            max_apdu: 5,
            invoke_id,
            sequence_number: None,
            proposed_window_size: None,
            service_choice,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let mut b0 = ApduType::ConfirmedRequest.first_octet();
        if self.segmented {
            b0 |= PDU_FLAG_SEGMENTED;
        }
        if self.more_follows {
            b0 |= PDU_FLAG_MORE_FOLLOWS;
        }
        if self.segmented_response_accepted {
            b0 |= PDU_FLAG_SEGMENTED_RESPONSE_ACCEPTED;
        }
        w.write_u8(b0)?;
        w.write_u8((self.max_segments << 4) | (self.max_apdu & 0x0F))?;
        w.write_u8(self.invoke_id)?;
        if self.segmented {
            w.write_u8(self.sequence_number.unwrap_or(0))?;
            w.write_u8(self.proposed_window_size.unwrap_or(1))?;
        }
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        if ApduType::from_first_octet(b0) != Some(ApduType::ConfirmedRequest) {
            return Err(DecodeError::InvalidValue);
        }
        let segmented = b0 & PDU_FLAG_SEGMENTED != 0;
        let seg_apdu = r.read_u8()?;
        let invoke_id = r.read_u8()?;
        let (sequence_number, proposed_window_size) = if segmented {
            (Some(r.read_u8()?), Some(r.read_u8()?))
        } else {
            (None, None)
        };
        Ok(Self {
            segmented,
            more_follows: b0 & PDU_FLAG_MORE_FOLLOWS != 0,
            segmented_response_accepted: b0 & PDU_FLAG_SEGMENTED_RESPONSE_ACCEPTED != 0,
            max_segments: seg_apdu >> 4,
            max_apdu: seg_apdu & 0x0F,
            invoke_id,
            sequence_number,
            proposed_window_size,
            service_choice: r.read_u8()?,
        })
    }
}

/// Unsegmented Complex-ACK header. The simulator never segments responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexAckHeader {
    pub invoke_id: u8,
    pub service_choice: u8,
}

impl ComplexAckHeader {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(ApduType::ComplexAck.first_octet())?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        if ApduType::from_first_octet(b0) != Some(ApduType::ComplexAck) {
            return Err(DecodeError::InvalidValue);
        }
        if b0 & PDU_FLAG_SEGMENTED != 0 {
            return Err(DecodeError::Unsupported);
        }
        Ok(Self {
            invoke_id: r.read_u8()?,
            service_choice: r.read_u8()?,
        })
    }
}

/// Error PDU with application-enumerated class and code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPdu {
    pub invoke_id: u8,
    pub service_choice: u8,
    pub error_class: u32,
    pub error_code: u32,
}

impl ErrorPdu {
    pub const fn new(
        invoke_id: u8,
        service_choice: u8,
        error_class: ErrorClass,
        error_code: ErrorCode,
    ) -> Self {
        Self {
            invoke_id,
            service_choice,
            error_class: error_class.to_u32(),
            error_code: error_code.to_u32(),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(ApduType::Error.first_octet())?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)?;
        encode_app_enumerated(w, self.error_class)?;
        encode_app_enumerated(w, self.error_code)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if ApduType::from_first_octet(r.read_u8()?) != Some(ApduType::Error) {
            return Err(DecodeError::InvalidValue);
        }
        Ok(Self {
            invoke_id: r.read_u8()?,
            service_choice: r.read_u8()?,
            error_class: decode_app_enumerated(r)?,
            error_code: decode_app_enumerated(r)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectPdu {
    pub invoke_id: u8,
    pub reason: u8,
}

impl RejectPdu {
    pub const fn new(invoke_id: u8, reason: RejectReason) -> Self {
        Self {
            invoke_id,
            reason: reason.to_u8(),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(ApduType::Reject.first_octet())?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.reason)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if ApduType::from_first_octet(r.read_u8()?) != Some(ApduType::Reject) {
            return Err(DecodeError::InvalidValue);
        }
        Ok(Self {
            invoke_id: r.read_u8()?,
            reason: r.read_u8()?,
        })
    }
}
