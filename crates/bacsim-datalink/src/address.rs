use core::fmt;
use std::net::SocketAddr;

/// Where a frame came from or is going to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataLinkAddress {
    Ip(SocketAddr),
}

impl DataLinkAddress {
    /// `0xBAC0`.
    pub const BACNET_IP_DEFAULT_PORT: u16 = 47808;

    pub fn as_socket_addr(self) -> SocketAddr {
        let Self::Ip(addr) = self;
        addr
    }
}

impl From<SocketAddr> for DataLinkAddress {
    fn from(addr: SocketAddr) -> Self {
        Self::Ip(addr)
    }
}

impl fmt::Display for DataLinkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_socket_addr())
    }
}
