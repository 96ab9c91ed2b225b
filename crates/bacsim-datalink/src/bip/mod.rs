/// BACnet Virtual Link Control header.
pub mod bvlc;
/// UDP transport.
pub mod transport;
