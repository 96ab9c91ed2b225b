use crate::encoding::{
    primitives::{decode_unsigned, encode_app_enumerated, encode_app_object_id, encode_app_unsigned},
    reader::Reader,
    tag::{AppTag, Tag},
    writer::Writer,
};
use crate::types::{BitString, DataValue, ObjectId};
use crate::{DecodeError, EncodeError};

fn u32_len(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::ValueOutOfRange)
}

pub fn encode_application_data_value(
    w: &mut Writer<'_>,
    value: &DataValue<'_>,
) -> Result<(), EncodeError> {
    match *value {
        DataValue::Null => Tag::Application {
            tag: AppTag::Null,
            len: 0,
        }
        .encode(w),
        // Booleans carry their value in the length field.
        DataValue::Boolean(v) => Tag::Application {
            tag: AppTag::Boolean,
            len: u32::from(v),
        }
        .encode(w),
        DataValue::Unsigned(v) => encode_app_unsigned(w, v),
        DataValue::Enumerated(v) => encode_app_enumerated(w, v),
        DataValue::Real(v) => {
            Tag::Application {
                tag: AppTag::Real,
                len: 4,
            }
            .encode(w)?;
            w.write_be_u32(v.to_bits())
        }
        DataValue::CharacterString(v) => {
            Tag::Application {
                tag: AppTag::CharacterString,
                len: u32_len(v.len().saturating_add(1))?,
            }
            .encode(w)?;
            // Character set 0: UTF-8.
            w.write_u8(0)?;
            w.write_all(v.as_bytes())
        }
        DataValue::BitString(v) => {
            if v.unused_bits > 7 {
                return Err(EncodeError::ValueOutOfRange);
            }
            Tag::Application {
                tag: AppTag::BitString,
                len: u32_len(v.data.len().saturating_add(1))?,
            }
            .encode(w)?;
            w.write_u8(v.unused_bits)?;
            w.write_all(v.data)
        }
        DataValue::ObjectId(v) => encode_app_object_id(w, v),
    }
}

pub fn decode_application_data_value<'a>(r: &mut Reader<'a>) -> Result<DataValue<'a>, DecodeError> {
    let (tag, len) = match Tag::decode(r)? {
        Tag::Application { tag, len } => (tag, len as usize),
        _ => return Err(DecodeError::InvalidTag),
    };

    match tag {
        AppTag::Null => Ok(DataValue::Null),
        AppTag::Boolean => Ok(DataValue::Boolean(len != 0)),
        AppTag::UnsignedInt => Ok(DataValue::Unsigned(decode_unsigned(r, len)?)),
        AppTag::Enumerated => Ok(DataValue::Enumerated(decode_unsigned(r, len)?)),
        AppTag::Real if len == 4 => Ok(DataValue::Real(f32::from_bits(r.read_be_u32()?))),
        AppTag::ObjectId if len == 4 => Ok(DataValue::ObjectId(ObjectId::from_raw(
            r.read_be_u32()?,
        ))),
        AppTag::CharacterString => {
            let raw = r.read_exact(len)?;
            match raw.split_first() {
                Some((&0, text)) => core::str::from_utf8(text)
                    .map(DataValue::CharacterString)
                    .map_err(|_| DecodeError::InvalidValue),
                Some(_) => Err(DecodeError::Unsupported),
                None => Err(DecodeError::InvalidLength),
            }
        }
        AppTag::BitString => {
            let raw = r.read_exact(len)?;
            match raw.split_first() {
                Some((&unused_bits, data)) if unused_bits <= 7 => {
                    Ok(DataValue::BitString(BitString::new(unused_bits, data)))
                }
                Some(_) => Err(DecodeError::InvalidValue),
                None => Err(DecodeError::InvalidLength),
            }
        }
        AppTag::Real | AppTag::ObjectId => Err(DecodeError::InvalidLength),
        AppTag::SignedInt | AppTag::Double | AppTag::OctetString | AppTag::Date | AppTag::Time => {
            Err(DecodeError::Unsupported)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_application_data_value, encode_application_data_value};
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::types::{BitString, DataValue, ObjectId, ObjectType};
    use crate::DecodeError;

    #[test]
    fn present_value_real_bytes() {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        encode_application_data_value(&mut w, &DataValue::Real(22.5)).unwrap();
        assert_eq!(w.as_written(), &[0x44, 0x41, 0xB4, 0x00, 0x00]);
    }

    #[test]
    fn every_served_shape_decodes_back() {
        let values = [
            DataValue::Boolean(false),
            DataValue::Unsigned(1024),
            DataValue::Enumerated(62),
            DataValue::Real(-0.5),
            DataValue::CharacterString("RoomTemperature"),
            DataValue::BitString(BitString::new(4, &[0x00])),
            DataValue::ObjectId(ObjectId::new(ObjectType::AnalogInput, 1)),
        ];
        let mut buf = [0u8; 128];
        let mut w = Writer::new(&mut buf);
        for v in &values {
            encode_application_data_value(&mut w, v).unwrap();
        }
        let mut r = Reader::new(w.as_written());
        for v in &values {
            assert_eq!(&decode_application_data_value(&mut r).unwrap(), v);
        }
        assert!(r.is_empty());
    }

    #[test]
    fn non_utf8_charset_is_unsupported() {
        let mut r = Reader::new(&[0x73, 0x04, b'a', b'b']);
        assert_eq!(
            decode_application_data_value(&mut r).unwrap_err(),
            DecodeError::Unsupported
        );
    }
}
