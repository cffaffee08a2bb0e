//! `ip` argument builders.
//!
//! Inputs are already validated; builders only lay out arguments. Free-text
//! tokens (interface names) are trimmed and otherwise passed through.

use std::net::IpAddr;

use netcfg_common::IpCommand;
use netcfg_types::{AdminState, IpPrefix, MacAddress, NudState};

/// Request JSON output from `ip`.
pub const JSON_FLAG: &str = "-j";

fn token(s: &str) -> String {
    s.trim().to_string()
}

/// `ip -j address show [<interface>]`
pub fn address_show(interface: Option<&str>) -> IpCommand {
    let cmd = IpCommand::new().args([JSON_FLAG, "address", "show"]);
    match interface {
        Some(dev) => cmd.arg(token(dev)),
        None => cmd,
    }
}

fn address_change(verb: &str, cidr: &IpPrefix, interface: &str) -> IpCommand {
    IpCommand::new()
        .args(["address", verb])
        .arg(cidr.to_string())
        .arg("dev")
        .arg(token(interface))
}

/// `ip address add <cidr> dev <interface>`
pub fn address_add(cidr: &IpPrefix, interface: &str) -> IpCommand {
    address_change("add", cidr, interface)
}

/// `ip address del <cidr> dev <interface>`
pub fn address_remove(cidr: &IpPrefix, interface: &str) -> IpCommand {
    address_change("del", cidr, interface)
}

/// `ip address flush dev <interface>`
pub fn address_flush(interface: &str) -> IpCommand {
    IpCommand::new()
        .args(["address", "flush", "dev"])
        .arg(token(interface))
}

/// `ip -j link show [dev <interface>]`
pub fn link_show(interface: Option<&str>) -> IpCommand {
    let cmd = IpCommand::new().args([JSON_FLAG, "link", "show"]);
    match interface {
        Some(dev) => cmd.arg("dev").arg(token(dev)),
        None => cmd,
    }
}

/// `ip link set <interface> {up|down}`
pub fn link_set_state(interface: &str, state: AdminState) -> IpCommand {
    IpCommand::new()
        .args(["link", "set"])
        .arg(token(interface))
        .arg(state.as_str())
}

/// `ip link set <interface> mtu <value>`
pub fn link_set_mtu(interface: &str, mtu: u32) -> IpCommand {
    IpCommand::new()
        .args(["link", "set"])
        .arg(token(interface))
        .arg("mtu")
        .arg(mtu.to_string())
}

/// `ip link set dev <old> name <new>`
pub fn link_rename(old_name: &str, new_name: &str) -> IpCommand {
    IpCommand::new()
        .args(["link", "set", "dev"])
        .arg(token(old_name))
        .arg("name")
        .arg(token(new_name))
}

/// `ip link set dev <interface> address <mac>`
///
/// The MAC is rendered in lowercase colon form, the only form `ip` parses.
pub fn link_set_mac(interface: &str, mac: &MacAddress) -> IpCommand {
    IpCommand::new()
        .args(["link", "set", "dev"])
        .arg(token(interface))
        .arg("address")
        .arg(mac.to_string())
}

/// `ip -j neigh show [dev <interface>]`
pub fn neighbor_show(interface: Option<&str>) -> IpCommand {
    let cmd = IpCommand::new().args([JSON_FLAG, "neigh", "show"]);
    match interface {
        Some(dev) => cmd.arg("dev").arg(token(dev)),
        None => cmd,
    }
}

fn neighbor_entry(
    verb: &str,
    ip: IpAddr,
    mac: &MacAddress,
    interface: &str,
    nud: NudState,
) -> IpCommand {
    IpCommand::new()
        .args(["neigh", verb])
        .arg(ip.to_string())
        .arg("lladdr")
        .arg(mac.to_string())
        .arg("dev")
        .arg(token(interface))
        .arg("nud")
        .arg(nud.as_str())
}

/// `ip neigh add <ip> lladdr <mac> dev <interface> nud <type>`
pub fn neighbor_add(ip: IpAddr, mac: &MacAddress, interface: &str, nud: NudState) -> IpCommand {
    neighbor_entry("add", ip, mac, interface, nud)
}

/// `ip neigh replace <ip> lladdr <mac> dev <interface> nud <type>`
pub fn neighbor_update(ip: IpAddr, mac: &MacAddress, interface: &str, nud: NudState) -> IpCommand {
    neighbor_entry("replace", ip, mac, interface, nud)
}

/// `ip neigh del <ip> dev <interface>`
pub fn neighbor_remove(ip: IpAddr, interface: &str) -> IpCommand {
    IpCommand::new()
        .args(["neigh", "del"])
        .arg(ip.to_string())
        .arg("dev")
        .arg(token(interface))
}

/// `ip neigh flush dev <interface>`, or `ip neigh flush all` when unscoped.
pub fn neighbor_flush(interface: Option<&str>) -> IpCommand {
    let cmd = IpCommand::new().args(["neigh", "flush"]);
    match interface {
        Some(dev) => cmd.arg("dev").arg(token(dev)),
        None => cmd.arg("all"),
    }
}
