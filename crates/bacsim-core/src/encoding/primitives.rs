use crate::encoding::{
    reader::Reader,
    tag::{AppTag, Tag},
    writer::Writer,
};
use crate::types::ObjectId;
use crate::{DecodeError, EncodeError};

/// Minimal big-endian octets for `value`, returned as a fixed array and length.
fn unsigned_octets(value: u32) -> ([u8; 4], usize) {
    let len = match value {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFF_FFFF => 3,
        _ => 4,
    };
    (value.to_be_bytes(), len)
}

pub fn encode_unsigned(w: &mut Writer<'_>, value: u32) -> Result<usize, EncodeError> {
    let (bytes, len) = unsigned_octets(value);
    w.write_all(&bytes[4 - len..])?;
    Ok(len)
}

pub fn decode_unsigned(r: &mut Reader<'_>, len: usize) -> Result<u32, DecodeError> {
    if !(1..=4).contains(&len) {
        return Err(DecodeError::InvalidLength);
    }
    Ok(r
        .read_exact(len)?
        .iter()
        .fold(0u32, |acc, b| (acc << 8) | u32::from(*b)))
}

fn encode_tagged_unsigned(w: &mut Writer<'_>, tag: Tag, value: u32) -> Result<(), EncodeError> {
    let (bytes, len) = unsigned_octets(value);
    let tag = match tag {
        Tag::Application { tag, .. } => Tag::Application {
            tag,
            len: len as u32,
        },
        Tag::Context { tag_num, .. } => Tag::Context {
            tag_num,
            len: len as u32,
        },
        other => other,
    };
    tag.encode(w)?;
    w.write_all(&bytes[4 - len..])
}

pub fn encode_app_unsigned(w: &mut Writer<'_>, value: u32) -> Result<(), EncodeError> {
    encode_tagged_unsigned(
        w,
        Tag::Application {
            tag: AppTag::UnsignedInt,
            len: 0,
        },
        value,
    )
}

pub fn encode_app_enumerated(w: &mut Writer<'_>, value: u32) -> Result<(), EncodeError> {
    encode_tagged_unsigned(
        w,
        Tag::Application {
            tag: AppTag::Enumerated,
            len: 0,
        },
        value,
    )
}

pub fn encode_ctx_unsigned(w: &mut Writer<'_>, tag_num: u8, value: u32) -> Result<(), EncodeError> {
    encode_tagged_unsigned(w, Tag::Context { tag_num, len: 0 }, value)
}

pub fn encode_ctx_object_id(
    w: &mut Writer<'_>,
    tag_num: u8,
    object_id: ObjectId,
) -> Result<(), EncodeError> {
    Tag::Context { tag_num, len: 4 }.encode(w)?;
    w.write_be_u32(object_id.raw())
}

pub fn encode_app_object_id(w: &mut Writer<'_>, object_id: ObjectId) -> Result<(), EncodeError> {
    Tag::Application {
        tag: AppTag::ObjectId,
        len: 4,
    }
    .encode(w)?;
    w.write_be_u32(object_id.raw())
}

pub fn decode_app_unsigned(r: &mut Reader<'_>) -> Result<u32, DecodeError> {
    match Tag::decode(r)? {
        Tag::Application {
            tag: AppTag::UnsignedInt,
            len,
        } => decode_unsigned(r, len as usize),
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn decode_app_enumerated(r: &mut Reader<'_>) -> Result<u32, DecodeError> {
    match Tag::decode(r)? {
        Tag::Application {
            tag: AppTag::Enumerated,
            len,
        } => decode_unsigned(r, len as usize),
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn decode_app_object_id(r: &mut Reader<'_>) -> Result<ObjectId, DecodeError> {
    match Tag::decode(r)? {
        Tag::Application {
            tag: AppTag::ObjectId,
            len: 4,
        } => Ok(ObjectId::from_raw(r.read_be_u32()?)),
        _ => Err(DecodeError::InvalidTag),
    }
}

/// Decodes a context-tagged unsigned that must carry `expected` as its tag number.
pub fn decode_ctx_unsigned(r: &mut Reader<'_>, expected: u8) -> Result<u32, DecodeError> {
    match Tag::decode(r)? {
        Tag::Context { tag_num, len } if tag_num == expected => decode_unsigned(r, len as usize),
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn decode_ctx_object_id(r: &mut Reader<'_>, expected: u8) -> Result<ObjectId, DecodeError> {
    match Tag::decode(r)? {
        Tag::Context { tag_num, len: 4 } if tag_num == expected => {
            Ok(ObjectId::from_raw(r.read_be_u32()?))
        }
        _ => Err(DecodeError::InvalidTag),
    }
}
