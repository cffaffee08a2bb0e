//! Input checks shared by the facades.
//!
//! Each check turns raw caller text into a validated value or a
//! [`NetCfgError::Validation`] naming the parameter.

use std::net::IpAddr;

use netcfg_common::{NetCfgError, NetCfgResult};
use netcfg_types::{validate, AdminState, IpPrefix, MacAddress, NudState};

/// Returns the trimmed value, rejecting blank input.
pub(crate) fn present<'a>(param: &'static str, value: &'a str) -> NetCfgResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(NetCfgError::validation(param, format!("{param} is required")));
    }
    Ok(value)
}

/// Normalizes an optional interface scope; blank means unscoped.
pub(crate) fn scope(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn cidr(value: &str) -> NetCfgResult<IpPrefix> {
    value
        .parse()
        .map_err(|_| NetCfgError::validation("ip_cidr", format!("Invalid IP CIDR: {value}")))
}

pub(crate) fn mtu(value: &str) -> NetCfgResult<u32> {
    validate::parse_mtu(value)
        .ok_or_else(|| NetCfgError::validation("mtu", format!("Invalid MTU value: {value}")))
}

pub(crate) fn mac(value: &str) -> NetCfgResult<MacAddress> {
    value.parse().map_err(|_| {
        NetCfgError::validation("mac_address", format!("Invalid MAC address: {value}"))
    })
}

pub(crate) fn ip(value: &str) -> NetCfgResult<IpAddr> {
    value
        .parse()
        .map_err(|_| NetCfgError::validation("ip_address", format!("Invalid IP address: {value}")))
}

pub(crate) fn admin_state(value: &str) -> NetCfgResult<AdminState> {
    value
        .parse()
        .map_err(|_| NetCfgError::validation("state", format!("Invalid state: {value}")))
}

/// Parses a neighbor type, defaulting to `permanent`.
pub(crate) fn nud(value: Option<&str>) -> NetCfgResult<NudState> {
    match value {
        None => Ok(NudState::default()),
        Some(v) => v.parse().map_err(|_| {
            NetCfgError::validation("nud", format!("Invalid neighbor type: {v}"))
        }),
    }
}
