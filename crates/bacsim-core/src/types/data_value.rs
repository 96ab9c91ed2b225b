use crate::types::{BitString, ObjectId};

/// An application-tagged primitive value, borrowing strings from the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataValue<'a> {
    Null,
    Boolean(bool),
    Unsigned(u32),
    Real(f32),
    CharacterString(&'a str),
    BitString(BitString<'a>),
    Enumerated(u32),
    ObjectId(ObjectId),
}
