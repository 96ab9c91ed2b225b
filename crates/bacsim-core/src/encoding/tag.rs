use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

const CLASS_CONTEXT: u8 = 0b0000_1000;
const EXTENDED_TAG_NUM: u8 = 0x0F;
const LVT_EXTENDED: u8 = 5;
const LVT_OPENING: u8 = 6;
const LVT_CLOSING: u8 = 7;

/// Application tag numbers for the primitive data types.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppTag {
    Null = 0,
    Boolean = 1,
    UnsignedInt = 2,
    SignedInt = 3,
    Real = 4,
    Double = 5,
    OctetString = 6,
    CharacterString = 7,
    BitString = 8,
    Enumerated = 9,
    Date = 10,
    Time = 11,
    ObjectId = 12,
}

impl AppTag {
    pub fn from_u8(value: u8) -> Result<Self, DecodeError> {
        Ok(match value {
            0 => Self::Null,
            1 => Self::Boolean,
            2 => Self::UnsignedInt,
            3 => Self::SignedInt,
            4 => Self::Real,
            5 => Self::Double,
            6 => Self::OctetString,
            7 => Self::CharacterString,
            8 => Self::BitString,
            9 => Self::Enumerated,
            10 => Self::Date,
            11 => Self::Time,
            12 => Self::ObjectId,
            _ => return Err(DecodeError::InvalidTag),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Application { tag: AppTag, len: u32 },
    Context { tag_num: u8, len: u32 },
    Opening { tag_num: u8 },
    Closing { tag_num: u8 },
}

impl Tag {
    pub fn encode(self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Tag::Application { tag, len } => encode_head(w, tag as u8, 0, len),
            Tag::Context { tag_num, len } => encode_head(w, tag_num, CLASS_CONTEXT, len),
            Tag::Opening { tag_num } => encode_tag_num(w, tag_num, CLASS_CONTEXT | LVT_OPENING),
            Tag::Closing { tag_num } => encode_tag_num(w, tag_num, CLASS_CONTEXT | LVT_CLOSING),
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let first = r.read_u8()?;
        let is_context = first & CLASS_CONTEXT != 0;
        let tag_num = match first >> 4 {
            EXTENDED_TAG_NUM => r.read_u8()?,
            n => n,
        };

        match (is_context, first & 0x07) {
            (true, LVT_OPENING) => Ok(Tag::Opening { tag_num }),
            (true, LVT_CLOSING) => Ok(Tag::Closing { tag_num }),
            (true, lvt) => Ok(Tag::Context {
                tag_num,
                len: decode_len(r, lvt)?,
            }),
            (false, lvt) => Ok(Tag::Application {
                tag: AppTag::from_u8(tag_num)?,
                len: decode_len(r, lvt)?,
            }),
        }
    }
}

/// Writes the initial octet (plus extended tag number, if any). `low_bits`
/// carries the class bit and the length/value/type field.
fn encode_tag_num(w: &mut Writer<'_>, tag_num: u8, low_bits: u8) -> Result<(), EncodeError> {
    if tag_num < EXTENDED_TAG_NUM {
        w.write_u8((tag_num << 4) | low_bits)
    } else {
        w.write_u8((EXTENDED_TAG_NUM << 4) | low_bits)?;
        w.write_u8(tag_num)
    }
}

fn encode_head(w: &mut Writer<'_>, tag_num: u8, class: u8, len: u32) -> Result<(), EncodeError> {
    if len < u32::from(LVT_EXTENDED) {
        return encode_tag_num(w, tag_num, class | len as u8);
    }

    encode_tag_num(w, tag_num, class | LVT_EXTENDED)?;
    match len {
        0..=253 => w.write_u8(len as u8),
        254..=0xFFFF => {
            w.write_u8(254)?;
            w.write_be_u16(len as u16)
        }
        _ => {
            w.write_u8(255)?;
            w.write_be_u32(len)
        }
    }
}

fn decode_len(r: &mut Reader<'_>, lvt: u8) -> Result<u32, DecodeError> {
    match lvt {
        0..=4 => Ok(u32::from(lvt)),
        LVT_EXTENDED => match r.read_u8()? {
            254 => Ok(u32::from(r.read_be_u16()?)),
            255 => r.read_be_u32(),
            n => Ok(u32::from(n)),
        },
        _ => Err(DecodeError::InvalidLength),
    }
}

#[cfg(test)]
mod tests {
    use super::{AppTag, Tag};
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::DecodeError;

    fn encoded(tag: Tag) -> ([u8; 8], usize) {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        tag.encode(&mut w).unwrap();
        let n = w.as_written().len();
        (buf, n)
    }

    #[test]
    fn short_tags_fit_in_one_octet() {
        let (buf, n) = encoded(Tag::Application {
            tag: AppTag::Real,
            len: 4,
        });
        assert_eq!(&buf[..n], &[0x44]);

        let (buf, n) = encoded(Tag::Context { tag_num: 1, len: 1 });
        assert_eq!(&buf[..n], &[0x19]);

        let (buf, n) = encoded(Tag::Opening { tag_num: 3 });
        assert_eq!(&buf[..n], &[0x3E]);
    }

    #[test]
    fn extended_tag_number_and_length_decode() {
        let (buf, n) = encoded(Tag::Context {
            tag_num: 30,
            len: 300,
        });
        assert_eq!(&buf[..n], &[0xFD, 30, 254, 0x01, 0x2C]);
        let mut r = Reader::new(&buf[..n]);
        assert_eq!(
            Tag::decode(&mut r).unwrap(),
            Tag::Context {
                tag_num: 30,
                len: 300
            }
        );
        assert!(r.is_empty());
    }

    #[test]
    fn unknown_application_tag_is_rejected() {
        let mut r = Reader::new(&[0xD1, 0x00]);
        assert_eq!(Tag::decode(&mut r).unwrap_err(), DecodeError::InvalidTag);
    }
}
