use bacsim_core::encoding::{reader::Reader, writer::Writer};
use bacsim_core::{DecodeError, EncodeError};

pub const BVLC_TYPE_BIP: u8 = 0x81;
pub const BVLC_HEADER_LEN: usize = 4;

/// BVLC functions a plain BACnet/IP device sees on the wire.
///
/// BBMD table management is never answered; those codes decode as
/// [`BvlcFunction::Other`] so the transport can report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BvlcFunction {
    Result,
    ForwardedNpdu,
    DistributeBroadcastToNetwork,
    OriginalUnicastNpdu,
    OriginalBroadcastNpdu,
    Other(u8),
}

impl BvlcFunction {
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0x00 => Self::Result,
            0x04 => Self::ForwardedNpdu,
            0x09 => Self::DistributeBroadcastToNetwork,
            0x0A => Self::OriginalUnicastNpdu,
            0x0B => Self::OriginalBroadcastNpdu,
            v => Self::Other(v),
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Result => 0x00,
            Self::ForwardedNpdu => 0x04,
            Self::DistributeBroadcastToNetwork => 0x09,
            Self::OriginalUnicastNpdu => 0x0A,
            Self::OriginalBroadcastNpdu => 0x0B,
            Self::Other(v) => v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BvlcHeader {
    pub function: BvlcFunction,
    /// Total frame length including this header.
    pub length: u16,
}

impl BvlcHeader {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(BVLC_TYPE_BIP)?;
        w.write_u8(self.function.to_u8())?;
        w.write_be_u16(self.length)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if r.read_u8()? != BVLC_TYPE_BIP {
            return Err(DecodeError::InvalidValue);
        }
        let function = BvlcFunction::from_u8(r.read_u8()?);
        let length = r.read_be_u16()?;
        if usize::from(length) < BVLC_HEADER_LEN {
            return Err(DecodeError::InvalidLength);
        }
        Ok(Self { function, length })
    }

    pub fn payload_len(&self) -> usize {
        usize::from(self.length) - BVLC_HEADER_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::{BvlcFunction, BvlcHeader, BVLC_TYPE_BIP};
    use bacsim_core::encoding::{reader::Reader, writer::Writer};
    use bacsim_core::DecodeError;

    #[test]
    fn original_unicast_header_bytes() {
        let h = BvlcHeader {
            function: BvlcFunction::OriginalUnicastNpdu,
            length: 25,
        };
        let mut buf = [0u8; 4];
        let mut w = Writer::new(&mut buf);
        h.encode(&mut w).unwrap();
        assert_eq!(w.as_written(), &[0x81, 0x0A, 0x00, 0x19]);
        assert_eq!(h.payload_len(), 21);
    }

    #[test]
    fn broadcast_header_decodes() {
        let mut r = Reader::new(&[BVLC_TYPE_BIP, 0x0B, 0x00, 0x0C]);
        let decoded = BvlcHeader::decode(&mut r).unwrap();
        assert_eq!(decoded.function, BvlcFunction::OriginalBroadcastNpdu);
        assert_eq!(decoded.length, 12);
    }

    #[test]
    fn bbmd_management_decodes_as_other() {
        let mut r = Reader::new(&[BVLC_TYPE_BIP, 0x05, 0, 6]);
        let decoded = BvlcHeader::decode(&mut r).unwrap();
        assert_eq!(decoded.function, BvlcFunction::Other(0x05));
    }

    #[test]
    fn rejects_foreign_type_and_short_length() {
        let mut r = Reader::new(&[0x82, 0x0A, 0, 8]);
        assert_eq!(BvlcHeader::decode(&mut r), Err(DecodeError::InvalidValue));
        let mut r = Reader::new(&[BVLC_TYPE_BIP, 0x0A, 0, 3]);
        assert_eq!(BvlcHeader::decode(&mut r), Err(DecodeError::InvalidLength));
    }
}
