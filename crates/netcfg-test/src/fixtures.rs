//! Canned `ip -j` output and iproute2 diagnostics
//!
//! Captured from iproute2 6.x under `LC_ALL=C` and trimmed to the fields
//! the tests look at.

use netcfg_common::ExecResult;

/// `ip -j address show eth0`
pub const ADDRESS_SHOW_ETH0: &str = r#"[{"ifindex":2,"ifname":"eth0","flags":["BROADCAST","MULTICAST","UP","LOWER_UP"],"mtu":1500,"qdisc":"fq_codel","operstate":"UP","group":"default","txqlen":1000,"link_type":"ether","address":"52:54:00:12:34:56","broadcast":"ff:ff:ff:ff:ff:ff","addr_info":[{"family":"inet","local":"10.0.0.5","prefixlen":24,"broadcast":"10.0.0.255","scope":"global","label":"eth0","valid_life_time":4294967295,"preferred_life_time":4294967295},{"family":"inet6","local":"fe80::5054:ff:fe12:3456","prefixlen":64,"scope":"link","valid_life_time":4294967295,"preferred_life_time":4294967295}]}]"#;

/// `ip -j link show`
pub const LINK_SHOW_ALL: &str = r#"[{"ifindex":1,"ifname":"lo","flags":["LOOPBACK","UP","LOWER_UP"],"mtu":65536,"qdisc":"noqueue","operstate":"UNKNOWN","linkmode":"DEFAULT","group":"default","txqlen":1000,"link_type":"loopback","address":"00:00:00:00:00:00","broadcast":"00:00:00:00:00:00"},{"ifindex":2,"ifname":"eth0","flags":["BROADCAST","MULTICAST","UP","LOWER_UP"],"mtu":1500,"qdisc":"fq_codel","operstate":"UP","linkmode":"DEFAULT","group":"default","txqlen":1000,"link_type":"ether","address":"52:54:00:12:34:56","broadcast":"ff:ff:ff:ff:ff:ff"}]"#;

/// `ip -j neigh show dev eth0`
pub const NEIGH_SHOW_ETH0: &str = r#"[{"dst":"192.168.1.100","dev":"eth0","lladdr":"aa:bb:cc:dd:ee:ff","state":["PERMANENT"]},{"dst":"192.168.1.1","dev":"eth0","lladdr":"52:54:00:ab:cd:ef","state":["REACHABLE"]},{"dst":"fe80::1","dev":"eth0","lladdr":"52:54:00:ab:cd:ef","router":null,"state":["STALE"]}]"#;

/// `ip address show <dev>` for a missing interface.
pub fn device_does_not_exist(device: &str) -> String {
    format!("Device \"{device}\" does not exist.")
}

/// Most commands naming a missing interface.
pub fn cannot_find_device(device: &str) -> String {
    format!("Cannot find device \"{device}\"")
}

pub const FILE_EXISTS: &str = "RTNETLINK answers: File exists";
pub const CANNOT_ASSIGN: &str = "RTNETLINK answers: Cannot assign requested address";
pub const NO_SUCH_FILE: &str = "RTNETLINK answers: No such file or directory";
pub const DEVICE_BUSY: &str = "RTNETLINK answers: Device or resource busy";
pub const NOT_PERMITTED: &str = "RTNETLINK answers: Operation not permitted";

/// Kernel rejection, as `ip` exits for RTNETLINK errors.
pub fn rtnetlink_failure(diagnostic: impl Into<String>) -> ExecResult {
    ExecResult::new(2, "", diagnostic)
}

/// Argument parsing or lookup failure inside `ip` itself.
pub fn usage_failure(diagnostic: impl Into<String>) -> ExecResult {
    ExecResult::new(1, "", diagnostic)
}
