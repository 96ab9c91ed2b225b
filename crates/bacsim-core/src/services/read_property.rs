use crate::apdu::{ComplexAckHeader, ConfirmedRequestHeader};
use crate::encoding::{
    primitives::{decode_ctx_object_id, decode_ctx_unsigned, encode_ctx_object_id, encode_ctx_unsigned},
    reader::Reader,
    tag::Tag,
    writer::Writer,
};
use crate::services::value_codec::encode_application_data_value;
use crate::types::{DataValue, ObjectId, PropertyId};
use crate::{DecodeError, EncodeError};

#[cfg(feature = "alloc")]
use crate::services::value_codec::decode_application_data_value;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

pub const SERVICE_READ_PROPERTY: u8 = 0x0C;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadPropertyRequest {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub invoke_id: u8,
}

impl ReadPropertyRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader::unsegmented(self.invoke_id, SERVICE_READ_PROPERTY).encode(w)?;
        encode_ctx_object_id(w, 0, self.object_id)?;
        encode_ctx_unsigned(w, 1, self.property_id.to_u32())?;
        if let Some(idx) = self.array_index {
            encode_ctx_unsigned(w, 2, idx)?;
        }
        Ok(())
    }

    /// Decodes the service parameters that follow a confirmed-request header.
    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        let object_id = decode_ctx_object_id(r, 0)?;
        let property_id = PropertyId::from_u32(decode_ctx_unsigned(r, 1)?);
        let array_index = if r.is_empty() {
            None
        } else {
            Some(decode_ctx_unsigned(r, 2)?)
        };
        Ok(Self {
            object_id,
            property_id,
            array_index,
            invoke_id,
        })
    }
}

/// ReadProperty-ACK. `values` holds one element for scalar properties and the
/// requested elements, in order, for arrays read without an index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadPropertyAck<'a> {
    pub invoke_id: u8,
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub values: &'a [DataValue<'a>],
}

impl ReadPropertyAck<'_> {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ComplexAckHeader {
            invoke_id: self.invoke_id,
            service_choice: SERVICE_READ_PROPERTY,
        }
        .encode(w)?;
        encode_ctx_object_id(w, 0, self.object_id)?;
        encode_ctx_unsigned(w, 1, self.property_id.to_u32())?;
        if let Some(idx) = self.array_index {
            encode_ctx_unsigned(w, 2, idx)?;
        }
        Tag::Opening { tag_num: 3 }.encode(w)?;
        for value in self.values {
            encode_application_data_value(w, value)?;
        }
        Tag::Closing { tag_num: 3 }.encode(w)
    }
}

/// A decoded ReadProperty-ACK, borrowing string values from the frame.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq)]
pub struct ReadPropertyResult<'a> {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub values: Vec<DataValue<'a>>,
}

#[cfg(feature = "alloc")]
impl<'a> ReadPropertyResult<'a> {
    pub fn decode_after_header(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let object_id = decode_ctx_object_id(r, 0)?;
        let property_id = PropertyId::from_u32(decode_ctx_unsigned(r, 1)?);

        let (array_index, open) = match Tag::decode(r)? {
            Tag::Context { tag_num: 2, len } => (
                Some(crate::encoding::primitives::decode_unsigned(r, len as usize)?),
                Tag::decode(r)?,
            ),
            other => (None, other),
        };
        if open != (Tag::Opening { tag_num: 3 }) {
            return Err(DecodeError::InvalidTag);
        }

        let mut values = Vec::new();
        loop {
            let mut peek = *r;
            if Tag::decode(&mut peek)? == (Tag::Closing { tag_num: 3 }) {
                *r = peek;
                break;
            }
            values.push(decode_application_data_value(r)?);
        }

        Ok(Self {
            object_id,
            property_id,
            array_index,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ReadPropertyAck, ReadPropertyRequest, SERVICE_READ_PROPERTY};
    use crate::apdu::{ComplexAckHeader, ConfirmedRequestHeader};
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::types::{DataValue, ObjectId, ObjectType, PropertyId};
    use crate::DecodeError;

    #[test]
    fn request_with_array_index_decodes() {
        let req = ReadPropertyRequest {
            object_id: ObjectId::new(ObjectType::Device, 599),
            property_id: PropertyId::ObjectList,
            array_index: Some(0),
            invoke_id: 4,
        };
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        let header = ConfirmedRequestHeader::decode(&mut r).unwrap();
        assert_eq!(header.service_choice, SERVICE_READ_PROPERTY);
        assert_eq!(
            ReadPropertyRequest::decode_after_header(&mut r, header.invoke_id).unwrap(),
            req
        );
    }

    #[test]
    fn request_with_wrong_first_tag_is_rejected() {
        let mut r = Reader::new(&[0x19, 0x55]);
        assert_eq!(
            ReadPropertyRequest::decode_after_header(&mut r, 1).unwrap_err(),
            DecodeError::InvalidTag
        );
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn object_list_ack_decodes_all_elements() {
        let list = [
            DataValue::ObjectId(ObjectId::new(ObjectType::Device, 599)),
            DataValue::ObjectId(ObjectId::new(ObjectType::AnalogInput, 1)),
        ];
        let ack = ReadPropertyAck {
            invoke_id: 9,
            object_id: ObjectId::new(ObjectType::Device, 599),
            property_id: PropertyId::ObjectList,
            array_index: None,
            values: &list,
        };
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        ack.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        let header = ComplexAckHeader::decode(&mut r).unwrap();
        assert_eq!(header.invoke_id, 9);
        let result = super::ReadPropertyResult::decode_after_header(&mut r).unwrap();
        assert_eq!(result.property_id, PropertyId::ObjectList);
        assert_eq!(result.values, list);
        assert!(r.is_empty());
    }
}
