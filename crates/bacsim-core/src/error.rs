//! Codec errors. Both are `Copy` and allocation-free so `no_std` decoders
//! can return them.

use core::fmt;

/// Failure writing a frame into a caller-owned buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The frame does not fit in the output buffer.
    BufferTooSmall,
    /// A field value has no wire representation.
    ValueOutOfRange,
}

impl EncodeError {
    const fn as_str(self) -> &'static str {
        match self {
            Self::BufferTooSmall => "frame does not fit the output buffer",
            Self::ValueOutOfRange => "value cannot be encoded",
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

/// Failure reading a received frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The frame ended before a complete field was read.
    UnexpectedEof,
    /// A tag had the wrong class or number for its position.
    InvalidTag,
    /// A length field was malformed or inconsistent with the tag.
    InvalidLength,
    /// A field decoded but its value is not allowed.
    InvalidValue,
    /// Valid BACnet that this codec does not handle.
    Unsupported,
}

impl DecodeError {
    pub const fn is_truncation(self) -> bool {
        matches!(self, Self::UnexpectedEof)
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::UnexpectedEof => "frame truncated",
            Self::InvalidTag => "unexpected tag",
            Self::InvalidLength => "malformed length",
            Self::InvalidValue => "value out of range",
            Self::Unsupported => "encoding not supported",
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}
