//! Value types and input validators for netcfg.
//!
//! Everything in this crate is pure: no I/O, no process spawning. The
//! facades in the `netcfg` crate run these checks before any `ip`
//! invocation is built.
//!
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses
//! - [`IpPrefix`]: IP address plus prefix length (CIDR notation)
//! - [`AdminState`] / [`OperState`]: requested and observed link states
//! - [`NudState`]: neighbor entry types accepted by `ip neigh`
//! - [`validate`]: boolean validators over raw caller text

mod ip;
mod mac;
mod state;
pub mod validate;

pub use ip::IpPrefix;
pub use mac::MacAddress;
pub use state::{AdminState, NudState, OperState};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("invalid IP prefix format: {0}")]
    InvalidIpPrefix(String),

    #[error("invalid link state: {0} (must be up or down)")]
    InvalidAdminState(String),

    #[error("invalid neighbor type: {0}")]
    InvalidNudState(String),
}
