//! Boolean validators over raw caller text.
//!
//! These never fail or panic; they answer "would this be accepted?" so the
//! facades can reject bad input before anything is handed to `ip`.

use std::net::IpAddr;

use crate::{mac, IpPrefix};

/// Returns true if `cidr` is `<ip>/<prefix>` with a prefix length that fits
/// the address family (0-32 for IPv4, 0-128 for IPv6).
///
/// ```
/// use netcfg_types::validate::is_valid_cidr;
///
/// assert!(is_valid_cidr("10.0.0.1/24"));
/// assert!(is_valid_cidr("fe80::1/64"));
/// assert!(!is_valid_cidr("300.1.1.1/24"));
/// assert!(!is_valid_cidr("10.0.0.1/33"));
/// assert!(!is_valid_cidr("10.0.0.1"));
/// ```
pub fn is_valid_cidr(cidr: &str) -> bool {
    cidr.parse::<IpPrefix>().is_ok()
}

/// Returns true if `mtu` is an integer greater than zero.
///
/// No upper bound is enforced beyond what fits in the command (`u32`);
/// the kernel rejects MTUs the device cannot carry.
pub fn is_valid_mtu(mtu: &str) -> bool {
    parse_mtu(mtu).is_some()
}

/// Parses an MTU, returning `None` for anything [`is_valid_mtu`] rejects.
pub fn parse_mtu(mtu: &str) -> Option<u32> {
    mtu.trim().parse::<u32>().ok().filter(|&value| value > 0)
}

/// Returns true if `mac` is six two-hex-digit octets separated uniformly by
/// `:` or `-`, in any letter case.
pub fn is_valid_mac_address(mac: &str) -> bool {
    mac::is_mac_syntax(mac)
}

/// Returns true if `ip` is an IPv4 or IPv6 literal.
pub fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}
