/// Confirmed-request header and the responses a server sends to it.
pub mod confirmed;
/// APDU type discriminant.
pub mod pdu;
/// Unconfirmed-request header.
pub mod unconfirmed;

pub use confirmed::{ComplexAckHeader, ConfirmedRequestHeader, ErrorPdu, RejectPdu};
pub use pdu::ApduType;
pub use unconfirmed::UnconfirmedRequestHeader;
