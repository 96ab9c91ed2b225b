//! Choosing the local IPv4 identity the simulated device presents.

use crate::SimError;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::process::Stdio;
use std::time::Duration;
use systemstat::{Platform, System};
use tokio::process::Command;

/// One address as reported by the operating system, before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddr {
    pub interface: String,
    pub address: IpAddr,
    pub netmask: Option<IpAddr>,
}

/// A local IPv4 address the device could bind to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CandidateAddress {
    pub interface: String,
    pub address: Ipv4Addr,
    /// Directed broadcast of the interface's subnet, when the netmask is known.
    pub broadcast: Option<Ipv4Addr>,
}

/// Local address and UDP port handed to the protocol stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkBinding {
    pub address: Ipv4Addr,
    pub port: u16,
    /// Where to listen for subnet broadcasts in addition to `address`.
    pub broadcast: Option<Ipv4Addr>,
}

impl NetworkBinding {
    pub fn new(address: Ipv4Addr, port: u16) -> Self {
        Self {
            address,
            port,
            broadcast: None,
        }
    }

    pub fn with_broadcast(mut self, broadcast: Option<Ipv4Addr>) -> Self {
        self.broadcast = broadcast;
        self
    }

    pub fn from_candidate(candidate: &CandidateAddress, port: u16) -> Self {
        Self::new(candidate.address, port).with_broadcast(candidate.broadcast)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(self.address), self.port)
    }
}

fn directed_broadcast(address: Ipv4Addr, netmask: Option<IpAddr>) -> Option<Ipv4Addr> {
    let Some(IpAddr::V4(mask)) = netmask else {
        return None;
    };
    let mask = u32::from(mask);
    if mask == 0 || mask == u32::MAX {
        return None;
    }
    Some(Ipv4Addr::from(u32::from(address) | !mask))
}

/// Keeps IPv4 addresses that are neither loopback nor unspecified, in input
/// order.
pub fn filter_candidates<I>(entries: I) -> Vec<CandidateAddress>
where
    I: IntoIterator<Item = InterfaceAddr>,
{
    entries
        .into_iter()
        .filter_map(|entry| match entry.address {
            IpAddr::V4(v4) if !v4.is_loopback() && !v4.is_unspecified() => Some(CandidateAddress {
                broadcast: directed_broadcast(v4, entry.netmask),
                interface: entry.interface,
                address: v4,
            }),
            _ => None,
        })
        .collect()
}

fn convert_addr(addr: &systemstat::IpAddr) -> Option<IpAddr> {
    match addr {
        systemstat::IpAddr::V4(v4) => Some(IpAddr::V4(*v4)),
        systemstat::IpAddr::V6(v6) => Some(IpAddr::V6(*v6)),
        systemstat::IpAddr::Empty | systemstat::IpAddr::Unsupported => None,
    }
}

/// Enumerates the host's usable IPv4 addresses.
pub fn list_candidate_addresses() -> Result<Vec<CandidateAddress>, SimError> {
    let networks = System::new()
        .networks()
        .map_err(SimError::InterfaceEnumeration)?;

    let entries = networks.into_values().flat_map(|network| {
        let interface = network.name;
        network.addrs.into_iter().filter_map(move |addrs| {
            Some(InterfaceAddr {
                interface: interface.clone(),
                address: convert_addr(&addrs.addr)?,
                netmask: convert_addr(&addrs.netmask),
            })
        })
    });

    let candidates = require_candidates(filter_candidates(entries))?;
    log::debug!("found {} candidate address(es)", candidates.len());
    Ok(candidates)
}

/// Fails with [`SimError::NoInterface`] when filtering left nothing to offer.
pub fn require_candidates(
    candidates: Vec<CandidateAddress>,
) -> Result<Vec<CandidateAddress>, SimError> {
    if candidates.is_empty() {
        return Err(SimError::NoInterface);
    }
    Ok(candidates)
}

/// Resolves the operator's raw `choice` to an index into `candidates`.
pub fn select_candidate<'a>(
    candidates: &'a [CandidateAddress],
    choice: &str,
) -> Result<&'a CandidateAddress, SimError> {
    let invalid = || SimError::InvalidSelection {
        input: choice.to_string(),
        len: candidates.len(),
    };
    let index: usize = choice.trim().parse().map_err(|_| invalid())?;
    candidates.get(index).ok_or_else(invalid)
}

pub fn select_address(candidates: &[CandidateAddress], choice: &str) -> Result<Ipv4Addr, SimError> {
    select_candidate(candidates, choice).map(|candidate| candidate.address)
}

/// Advisory liveness check through the system `ping` program.
///
/// Every failure mode, including a missing binary, is reported as `false`
/// and logged; callers continue either way.
#[derive(Debug, Clone)]
pub struct ReachabilityProbe {
    program: String,
    timeout: Duration,
}

impl ReachabilityProbe {
    pub fn new(timeout: Duration) -> Self {
        Self::with_program("ping", timeout)
    }

    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub async fn check(&self, address: &str) -> bool {
        match address.trim().parse::<IpAddr>() {
            Ok(ip) => self.check_addr(ip).await,
            Err(_) => {
                log::warn!("reachability check skipped: {address:?} is not an IP address");
                false
            }
        }
    }

    pub async fn check_addr(&self, address: IpAddr) -> bool {
        let whole = self.timeout.as_secs() + u64::from(self.timeout.subsec_nanos() > 0);
        let wait_secs = whole.max(1).to_string();
        let mut command = Command::new(&self.program);
        command
            .args(["-c", "1", "-W", wait_secs.as_str()])
            .arg(address.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        // `ping -W` rounds to whole seconds; allow it to finish on its own.
        let deadline = self.timeout + Duration::from_millis(500);
        match tokio::time::timeout(deadline, command.status()).await {
            Ok(Ok(status)) if status.success() => {
                log::debug!("{address} answered an echo request");
                true
            }
            Ok(Ok(status)) => {
                log::warn!("{address} did not answer an echo request ({status})");
                false
            }
            Ok(Err(err)) => {
                log::warn!("could not run {} to check {address}: {err}", self.program);
                false
            }
            Err(_) => {
                log::warn!("echo request to {address} timed out after {:?}", self.timeout);
                false
            }
        }
    }
}

pub async fn check_reachability(address: Ipv4Addr, timeout: Duration) -> bool {
    ReachabilityProbe::new(timeout)
        .check_addr(IpAddr::V4(address))
        .await
}
