/// Encoders and decoders for unsigned, enumerated, real and object-id payloads.
pub mod primitives;
/// Zero-copy byte reader over a received frame.
pub mod reader;
/// Application, context and opening/closing tags.
pub mod tag;
/// Bounded writer into a caller-owned buffer.
pub mod writer;
