//! BACnet wire codecs for the bacsim device simulator.
//!
//! `bacsim-core` covers only what a single simulated field device needs to be
//! discovered and read: the tag system, NPDU and APDU headers, and the
//! Who-Is, I-Am and ReadProperty service payloads. Everything borrows from the
//! caller's buffers and works without `std`.
//!
//! # Feature flags
//!
//! - **`std`** (default): enables `std::error::Error` implementations.
//! - **`alloc`** (default): enables decoders that collect array values.
//! - **`serde`**: derives `Serialize`/`Deserialize` on identifier types.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

/// APDU headers: confirmed/unconfirmed requests, acks, errors and rejects.
pub mod apdu;
/// Tag system, primitive encoders and the zero-copy reader/writer.
pub mod encoding;
/// Error types for encoding and decoding operations.
pub mod error;
/// NPDU (network layer) header.
pub mod npdu;
/// Who-Is, I-Am and ReadProperty codecs.
pub mod services;
/// Object identifiers, property identifiers, enumerations and data values.
pub mod types;

pub use error::{DecodeError, EncodeError};
