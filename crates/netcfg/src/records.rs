//! Records decoded from `ip -j` query output.
//!
//! The tool owns the schema, so records are open JSON objects. The typed
//! accessors below read the fields this crate relies on; everything else
//! is reachable through [`Record::get`] and survives serialization as-is.

use std::net::IpAddr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use netcfg_common::{NetCfgError, NetCfgResult};
use netcfg_types::{IpPrefix, MacAddress, OperState};

/// Field name to value mapping as emitted by the tool.
pub type Fields = Map<String, Value>;

/// Decodes query output into records.
///
/// Blank output is an empty list (`ip -j neigh show` prints nothing for an
/// empty table). Anything else must be a JSON array of objects.
pub fn parse_records<T: DeserializeOwned>(what: &'static str, stdout: &str) -> NetCfgResult<Vec<T>> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(stdout).map_err(|source| NetCfgError::Parse { what, source })
}

/// Shared accessors over an open record.
pub trait Record {
    fn fields(&self) -> &Fields;

    /// Returns the raw value of `field`.
    fn get(&self, field: &str) -> Option<&Value> {
        self.fields().get(field)
    }

    fn str_field(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    fn u64_field(&self, field: &str) -> Option<u64> {
        self.get(field).and_then(Value::as_u64)
    }

    /// Returns a string array field, skipping non-string elements.
    fn str_list(&self, field: &str) -> Vec<&str> {
        self.get(field)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

macro_rules! open_record {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Fields);

        impl $name {
            pub fn into_fields(self) -> Fields {
                self.0
            }
        }

        impl Record for $name {
            fn fields(&self) -> &Fields {
                &self.0
            }
        }

        impl From<Fields> for $name {
            fn from(fields: Fields) -> Self {
                Self(fields)
            }
        }
    };
}

open_record!(
    /// One interface from `ip -j link show`.
    Link
);

open_record!(
    /// One interface with its addresses, from `ip -j address show`.
    InterfaceAddresses
);

open_record!(
    /// One element of an interface's `addr_info` array.
    AddrInfo
);

open_record!(
    /// One entry from `ip -j neigh show`.
    Neighbor
);

/// Interface fields common to link and address listings.
pub trait InterfaceRecord: Record {
    fn name(&self) -> Option<&str> {
        self.str_field("ifname")
    }

    fn index(&self) -> Option<u64> {
        self.u64_field("ifindex")
    }

    fn mtu(&self) -> Option<u32> {
        self.u64_field("mtu").and_then(|v| u32::try_from(v).ok())
    }

    fn oper_state(&self) -> Option<OperState> {
        self.str_field("operstate").map(OperState::from_report)
    }

    fn flags(&self) -> Vec<&str> {
        self.str_list("flags")
    }

    /// Returns true if the interface is administratively up (`UP` flag).
    fn is_admin_up(&self) -> bool {
        self.flags().contains(&"UP")
    }

    /// Returns the hardware address, if it is an Ethernet-style MAC.
    fn mac(&self) -> Option<MacAddress> {
        self.str_field("address").and_then(|s| s.parse().ok())
    }
}

impl InterfaceRecord for Link {}
impl InterfaceRecord for InterfaceAddresses {}

impl Link {
    /// Link type (`ether`, `loopback`, `none`, ...).
    pub fn link_type(&self) -> Option<&str> {
        self.str_field("link_type")
    }
}

impl InterfaceAddresses {
    /// Returns the assigned addresses. Malformed elements are skipped.
    pub fn addr_info(&self) -> Vec<AddrInfo> {
        self.get("addr_info")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .cloned()
                    .map(AddrInfo::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the assigned addresses in CIDR form.
    pub fn cidrs(&self) -> Vec<String> {
        self.addr_info().iter().filter_map(AddrInfo::cidr).collect()
    }

    /// Returns true if `prefix` is assigned to this interface.
    pub fn has_address(&self, prefix: &IpPrefix) -> bool {
        self.addr_info()
            .iter()
            .any(|info| info.prefix().as_ref() == Some(prefix))
    }
}

impl AddrInfo {
    /// `inet` or `inet6`.
    pub fn family(&self) -> Option<&str> {
        self.str_field("family")
    }

    pub fn local(&self) -> Option<&str> {
        self.str_field("local")
    }

    pub fn prefix_len(&self) -> Option<u8> {
        self.u64_field("prefixlen").and_then(|v| u8::try_from(v).ok())
    }

    pub fn scope(&self) -> Option<&str> {
        self.str_field("scope")
    }

    pub fn label(&self) -> Option<&str> {
        self.str_field("label")
    }

    /// `local/prefixlen`, when both are present.
    pub fn cidr(&self) -> Option<String> {
        Some(format!("{}/{}", self.local()?, self.prefix_len()?))
    }

    pub fn prefix(&self) -> Option<IpPrefix> {
        self.cidr()?.parse().ok()
    }
}

impl Neighbor {
    /// Destination IP address as reported.
    pub fn dst(&self) -> Option<&str> {
        self.str_field("dst")
    }

    pub fn ip(&self) -> Option<IpAddr> {
        self.dst().and_then(|s| s.parse().ok())
    }

    pub fn dev(&self) -> Option<&str> {
        self.str_field("dev")
    }

    /// Link-layer address as reported (absent for incomplete/failed entries).
    pub fn lladdr(&self) -> Option<&str> {
        self.str_field("lladdr")
    }

    pub fn mac(&self) -> Option<MacAddress> {
        self.lladdr().and_then(|s| s.parse().ok())
    }

    /// NUD state names, e.g. `["PERMANENT"]` or `["REACHABLE"]`.
    pub fn states(&self) -> Vec<&str> {
        self.str_list("state")
    }

    /// Returns true if the entry carries `state` (case-insensitive).
    pub fn has_state(&self, state: &str) -> bool {
        self.states().iter().any(|s| s.eq_ignore_ascii_case(state))
    }
}
