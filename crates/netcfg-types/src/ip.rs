//! IP prefix (CIDR) type with strict parsing.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// An interface address in CIDR notation (e.g. `10.0.0.1/24` or `2001:db8::1/64`).
///
/// Unlike a route prefix, host bits are kept as given: `10.0.0.1/24` stays
/// `10.0.0.1/24`, because that is what `ip address add` expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IpPrefix {
    address: IpAddr,
    prefix_len: u8,
}

impl IpPrefix {
    /// Creates a new prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix length exceeds 32 for IPv4 or 128 for IPv6.
    pub fn new(address: IpAddr, prefix_len: u8) -> Result<Self, ParseError> {
        let max_len = Self::max_len_for(&address);
        if prefix_len > max_len {
            return Err(ParseError::InvalidIpPrefix(format!(
                "prefix length {} exceeds maximum {} for {}",
                prefix_len, max_len, address
            )));
        }

        Ok(IpPrefix {
            address,
            prefix_len,
        })
    }

    const fn max_len_for(address: &IpAddr) -> u8 {
        match address {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        }
    }

    pub const fn address(&self) -> IpAddr {
        self.address
    }

    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub const fn is_ipv4(&self) -> bool {
        self.address.is_ipv4()
    }

    pub const fn is_ipv6(&self) -> bool {
        self.address.is_ipv6()
    }

    /// Returns true for /32 (IPv4) or /128 (IPv6).
    pub const fn is_host(&self) -> bool {
        self.prefix_len == Self::max_len_for(&self.address)
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

impl FromStr for IpPrefix {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidIpPrefix(s.to_string());

        let (addr_str, len_str) = s.split_once('/').ok_or_else(invalid)?;

        // "a/b/c" has more than one '/', and u8 parsing would accept "+24"
        if len_str.is_empty() || !len_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let address: IpAddr = addr_str
            .parse()
            .map_err(|_| ParseError::InvalidIpAddress(addr_str.to_string()))?;

        // Longer digit runs than u8 can hold are out of range for both families.
        let prefix_len: u8 = len_str.parse().map_err(|_| invalid())?;

        IpPrefix::new(address, prefix_len)
    }
}

impl TryFrom<String> for IpPrefix {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<IpPrefix> for String {
    fn from(prefix: IpPrefix) -> String {
        prefix.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ipv4_prefix_parse() {
        let prefix: IpPrefix = "10.0.0.1/24".parse().unwrap();
        assert!(prefix.is_ipv4());
        assert_eq!(prefix.prefix_len(), 24);
        assert_eq!(prefix.to_string(), "10.0.0.1/24");
    }

    #[test]
    fn test_ipv6_prefix_parse() {
        let prefix: IpPrefix = "2001:db8::1/64".parse().unwrap();
        assert!(prefix.is_ipv6());
        assert_eq!(prefix.prefix_len(), 64);
    }

    #[test]
    fn test_prefix_bounds() {
        assert!("0.0.0.0/0".parse::<IpPrefix>().is_ok());
        assert!("10.0.0.1/32".parse::<IpPrefix>().unwrap().is_host());
        assert!("10.0.0.1/33".parse::<IpPrefix>().is_err());
        assert!("::/0".parse::<IpPrefix>().is_ok());
        assert!("2001:db8::1/128".parse::<IpPrefix>().unwrap().is_host());
        assert!("2001:db8::1/129".parse::<IpPrefix>().is_err());
        assert!("10.0.0.1/256".parse::<IpPrefix>().is_err());
        assert!("10.0.0.1/99999999999".parse::<IpPrefix>().is_err());
    }

    #[test]
    fn test_malformed_prefix() {
        assert!("10.0.0.1".parse::<IpPrefix>().is_err());
        assert!("10.0.0.1/".parse::<IpPrefix>().is_err());
        assert!("/24".parse::<IpPrefix>().is_err());
        assert!("10.0.0.1/24/1".parse::<IpPrefix>().is_err());
        assert!("10.0.0.1/+24".parse::<IpPrefix>().is_err());
        assert!("10.0.0.1/-1".parse::<IpPrefix>().is_err());
        assert!("10.0.0.1/ 24".parse::<IpPrefix>().is_err());
        assert!("300.1.1.1/24".parse::<IpPrefix>().is_err());
    }

    #[test]
    fn test_invalid_address_reports_address() {
        let err = "300.1.1.1/24".parse::<IpPrefix>().unwrap_err();
        assert_eq!(err, ParseError::InvalidIpAddress("300.1.1.1".to_string()));
    }
}
