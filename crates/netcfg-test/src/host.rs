//! In-memory stand-in for `ip` and the kernel tables it edits.
//!
//! Understands exactly the argument layouts netcfg builds, keeps interface,
//! address and neighbor state across calls, prints `ip -j` style JSON and
//! fails with the same diagnostics iproute2 does.

use std::sync::Mutex;

use async_trait::async_trait;
use netcfg_common::{CommandRunner, ExecResult, IpCommand, NetCfgResult};
use serde_json::{json, Value};

use crate::fixtures::{
    cannot_find_device, device_does_not_exist, rtnetlink_failure, usage_failure, CANNOT_ASSIGN,
    DEVICE_BUSY, FILE_EXISTS, NO_SUCH_FILE,
};
use crate::lock;

const MIN_MTU: u32 = 68;
const MAX_ETHER_MTU: u32 = 9216;

#[derive(Debug, Clone)]
struct Address {
    local: String,
    prefix_len: u8,
}

impl Address {
    fn family(&self) -> &'static str {
        if self.local.contains(':') {
            "inet6"
        } else {
            "inet"
        }
    }

    fn to_json(&self, label: &str) -> Value {
        let scope = match self.local.as_str() {
            "127.0.0.1" | "::1" => "host",
            l if l.starts_with("fe80:") => "link",
            _ => "global",
        };
        let mut info = json!({
            "family": self.family(),
            "local": self.local,
            "prefixlen": self.prefix_len,
            "scope": scope,
            "valid_life_time": 4294967295u64,
            "preferred_life_time": 4294967295u64,
        });
        if self.family() == "inet" {
            info["label"] = json!(label);
        }
        info
    }
}

#[derive(Debug, Clone)]
struct Interface {
    index: u64,
    name: String,
    mtu: u32,
    up: bool,
    mac: String,
    loopback: bool,
    addresses: Vec<Address>,
}

impl Interface {
    fn flags(&self) -> Vec<&'static str> {
        match (self.loopback, self.up) {
            (true, true) => vec!["LOOPBACK", "UP", "LOWER_UP"],
            (true, false) => vec!["LOOPBACK"],
            (false, true) => vec!["BROADCAST", "MULTICAST", "UP", "LOWER_UP"],
            (false, false) => vec!["BROADCAST", "MULTICAST"],
        }
    }

    fn link_json(&self) -> Value {
        let operstate = match (self.loopback, self.up) {
            (true, _) => "UNKNOWN",
            (false, true) => "UP",
            (false, false) => "DOWN",
        };
        let (link_type, broadcast, qdisc) = if self.loopback {
            ("loopback", "00:00:00:00:00:00", "noqueue")
        } else {
            ("ether", "ff:ff:ff:ff:ff:ff", "fq_codel")
        };
        json!({
            "ifindex": self.index,
            "ifname": self.name,
            "flags": self.flags(),
            "mtu": self.mtu,
            "qdisc": qdisc,
            "operstate": operstate,
            "linkmode": "DEFAULT",
            "group": "default",
            "txqlen": 1000,
            "link_type": link_type,
            "address": self.mac,
            "broadcast": broadcast,
        })
    }

    fn address_json(&self) -> Value {
        let mut value = self.link_json();
        value["addr_info"] = self
            .addresses
            .iter()
            .map(|a| a.to_json(&self.name))
            .collect();
        value
    }
}

#[derive(Debug, Clone)]
struct NeighborEntry {
    dst: String,
    dev: String,
    lladdr: String,
    nud: String,
}

impl NeighborEntry {
    fn to_json(&self) -> Value {
        json!({
            "dst": self.dst,
            "dev": self.dev,
            "lladdr": self.lladdr,
            "state": [self.nud.to_uppercase()],
        })
    }

    /// `ip neigh flush` leaves static entries alone.
    fn is_static(&self) -> bool {
        matches!(self.nud.as_str(), "permanent" | "noarp")
    }
}

#[derive(Debug)]
struct HostState {
    next_index: u64,
    interfaces: Vec<Interface>,
    neighbors: Vec<NeighborEntry>,
}

impl HostState {
    fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    fn interface_mut(&mut self, name: &str) -> Result<&mut Interface, ExecResult> {
        self.interfaces
            .iter_mut()
            .find(|i| i.name == name)
            .ok_or_else(|| usage_failure(cannot_find_device(name)))
    }

    fn require(&self, name: &str) -> Result<(), ExecResult> {
        match self.interface(name) {
            Some(_) => Ok(()),
            None => Err(usage_failure(cannot_find_device(name))),
        }
    }

    fn dispatch(&mut self, argv: &[&str]) -> Result<String, ExecResult> {
        match argv {
            ["-j", "address", "show"] => self.render(None, Interface::address_json),
            ["-j", "address", "show", dev] => self.render(Some(*dev), Interface::address_json),
            ["address", verb @ ("add" | "del"), cidr, "dev", dev] => {
                self.change_address(verb, cidr, dev)
            }
            ["address", "flush", "dev", dev] => {
                self.interface_mut(dev)?.addresses.clear();
                Ok(String::new())
            }
            ["-j", "link", "show"] => self.render(None, Interface::link_json),
            ["-j", "link", "show", "dev", dev] => self.render(Some(*dev), Interface::link_json),
            ["link", "set", dev, state @ ("up" | "down")] => {
                self.interface_mut(dev)?.up = *state == "up";
                Ok(String::new())
            }
            ["link", "set", dev, "mtu", mtu] => self.set_mtu(dev, mtu),
            ["link", "set", "dev", old, "name", new] => self.rename(old, new),
            ["link", "set", "dev", dev, "address", mac] => self.set_mac(dev, mac),
            ["-j", "neigh", "show"] => Ok(self.render_neighbors(None)),
            ["-j", "neigh", "show", "dev", dev] => {
                self.require(dev)?;
                Ok(self.render_neighbors(Some(*dev)))
            }
            ["neigh", verb @ ("add" | "replace"), ip, "lladdr", mac, "dev", dev, "nud", nud] => {
                self.write_neighbor(verb == &"replace", ip, mac, dev, nud)
            }
            ["neigh", "del", ip, "dev", dev] => {
                self.require(dev)?;
                let before = self.neighbors.len();
                self.neighbors.retain(|n| !(n.dst == *ip && n.dev == *dev));
                if self.neighbors.len() == before {
                    return Err(rtnetlink_failure(NO_SUCH_FILE));
                }
                Ok(String::new())
            }
            ["neigh", "flush", "dev", dev] => {
                self.require(dev)?;
                self.neighbors.retain(|n| n.dev != *dev || n.is_static());
                Ok(String::new())
            }
            ["neigh", "flush", "all"] => {
                self.neighbors.retain(NeighborEntry::is_static);
                Ok(String::new())
            }
            _ => Err(usage_failure(
                "Command line is not complete. Try option \"help\"",
            )),
        }
    }

    fn render(
        &self,
        dev: Option<&str>,
        to_json: fn(&Interface) -> Value,
    ) -> Result<String, ExecResult> {
        let items: Vec<Value> = match dev {
            Some(name) => {
                let iface = self
                    .interface(name)
                    .ok_or_else(|| usage_failure(device_does_not_exist(name)))?;
                vec![to_json(iface)]
            }
            None => self.interfaces.iter().map(to_json).collect(),
        };
        Ok(Value::Array(items).to_string())
    }

    fn render_neighbors(&self, dev: Option<&str>) -> String {
        let items: Vec<Value> = self
            .neighbors
            .iter()
            .filter(|n| dev.map_or(true, |d| n.dev == d))
            .map(NeighborEntry::to_json)
            .collect();
        Value::Array(items).to_string()
    }

    fn change_address(&mut self, verb: &str, cidr: &str, dev: &str) -> Result<String, ExecResult> {
        let (local, prefix_len) = cidr
            .split_once('/')
            .and_then(|(local, len)| Some((local.to_string(), len.parse::<u8>().ok()?)))
            .ok_or_else(|| usage_failure(format!("Error: inet prefix is expected rather than \"{cidr}\".")))?;

        let iface = self.interface_mut(dev)?;
        let position = iface
            .addresses
            .iter()
            .position(|a| a.local == local && a.prefix_len == prefix_len);

        match (verb, position) {
            ("add", Some(_)) => Err(rtnetlink_failure(FILE_EXISTS)),
            ("add", None) => {
                iface.addresses.push(Address { local, prefix_len });
                Ok(String::new())
            }
            (_, Some(i)) => {
                iface.addresses.remove(i);
                Ok(String::new())
            }
            (_, None) => Err(rtnetlink_failure(CANNOT_ASSIGN)),
        }
    }

    fn set_mtu(&mut self, dev: &str, mtu: &str) -> Result<String, ExecResult> {
        let iface = self.interface_mut(dev)?;
        let value: u32 = mtu
            .parse()
            .map_err(|_| usage_failure(format!("Error: argument \"{mtu}\" is wrong: Invalid \"mtu\" value")))?;
        if value < MIN_MTU {
            return Err(rtnetlink_failure("Error: mtu less than device minimum."));
        }
        if !iface.loopback && value > MAX_ETHER_MTU {
            return Err(rtnetlink_failure("Error: mtu greater than device maximum."));
        }
        iface.mtu = value;
        Ok(String::new())
    }

    fn rename(&mut self, old: &str, new: &str) -> Result<String, ExecResult> {
        if self.interface(new).is_some() {
            self.require(old)?;
            return Err(rtnetlink_failure(FILE_EXISTS));
        }
        let iface = self.interface_mut(old)?;
        if iface.up {
            return Err(rtnetlink_failure(DEVICE_BUSY));
        }
        iface.name = new.to_string();
        for neighbor in self.neighbors.iter_mut().filter(|n| n.dev == old) {
            neighbor.dev = new.to_string();
        }
        Ok(String::new())
    }

    fn set_mac(&mut self, dev: &str, mac: &str) -> Result<String, ExecResult> {
        let iface = self.interface_mut(dev)?;
        let first_octet = u8::from_str_radix(mac.get(0..2).unwrap_or_default(), 16)
            .map_err(|_| usage_failure(format!("\"{mac}\" is invalid lladdr.")))?;
        if first_octet & 0x01 != 0 {
            return Err(rtnetlink_failure(CANNOT_ASSIGN));
        }
        iface.mac = mac.to_lowercase();
        Ok(String::new())
    }

    fn write_neighbor(
        &mut self,
        replace: bool,
        ip: &str,
        mac: &str,
        dev: &str,
        nud: &str,
    ) -> Result<String, ExecResult> {
        self.require(dev)?;
        let entry = NeighborEntry {
            dst: ip.to_string(),
            dev: dev.to_string(),
            lladdr: mac.to_lowercase(),
            nud: nud.to_string(),
        };

        match self.neighbors.iter_mut().find(|n| n.dst == ip && n.dev == dev) {
            Some(existing) if replace => *existing = entry,
            Some(_) => return Err(rtnetlink_failure(FILE_EXISTS)),
            None => self.neighbors.push(entry),
        }
        Ok(String::new())
    }
}

/// A [`CommandRunner`] backed by simulated kernel state.
///
/// Starts with `lo` (up, `127.0.0.1/8`). Add interfaces with
/// [`with_interface`](Self::with_interface).
#[derive(Debug)]
pub struct SimulatedHost {
    state: Mutex<HostState>,
    captured_commands: Mutex<Vec<IpCommand>>,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHost {
    pub fn new() -> Self {
        let lo = Interface {
            index: 1,
            name: "lo".to_string(),
            mtu: 65536,
            up: true,
            mac: "00:00:00:00:00:00".to_string(),
            loopback: true,
            addresses: vec![Address {
                local: "127.0.0.1".to_string(),
                prefix_len: 8,
            }],
        };
        Self {
            state: Mutex::new(HostState {
                next_index: 2,
                interfaces: vec![lo],
                neighbors: Vec::new(),
            }),
            captured_commands: Mutex::new(Vec::new()),
        }
    }

    /// Adds an Ethernet interface, administratively down, MTU 1500.
    pub fn with_interface(self, name: &str, mac: &str) -> Self {
        {
            let mut state = lock(&self.state);
            let index = state.next_index;
            state.next_index += 1;
            state.interfaces.push(Interface {
                index,
                name: name.to_string(),
                mtu: 1500,
                up: false,
                mac: mac.to_lowercase(),
                loopback: false,
                addresses: Vec::new(),
            });
        }
        self
    }

    /// Commands run so far, rendered as command lines.
    pub fn lines(&self) -> Vec<String> {
        lock(&self.captured_commands)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Current interface names in index order.
    pub fn interface_names(&self) -> Vec<String> {
        lock(&self.state)
            .interfaces
            .iter()
            .map(|i| i.name.clone())
            .collect()
    }

    /// Number of neighbor entries across all interfaces.
    pub fn neighbor_count(&self) -> usize {
        lock(&self.state).neighbors.len()
    }
}

#[async_trait]
impl CommandRunner for SimulatedHost {
    async fn run(&self, cmd: &IpCommand) -> NetCfgResult<ExecResult> {
        lock(&self.captured_commands).push(cmd.clone());

        let argv: Vec<&str> = cmd.argv().iter().map(String::as_str).collect();
        let result = match lock(&self.state).dispatch(&argv) {
            Ok(stdout) => ExecResult::new(0, stdout, ""),
            Err(failure) => failure,
        };
        Ok(result)
    }
}
