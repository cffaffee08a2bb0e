//! MAC address type with strict parsing and canonical formatting.

use crate::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Six two-hex-digit octets, all separated by `:` or all separated by `-`.
static MAC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:[0-9A-Fa-f]{2}:){5}|(?:[0-9A-Fa-f]{2}-){5})[0-9A-Fa-f]{2}$")
        .expect("Invalid regex pattern")
});

/// Returns true if `s` is a MAC address in colon or hyphen notation.
pub(crate) fn is_mac_syntax(s: &str) -> bool {
    MAC_RE.is_match(s)
}

/// A 48-bit Ethernet MAC address.
///
/// # Examples
///
/// ```
/// use netcfg_types::MacAddress;
///
/// let mac: MacAddress = "AA:BB:CC:DD:EE:FF".parse().unwrap();
/// assert_eq!(mac.to_string(), "aa:bb:cc:dd:ee:ff");
///
/// let mac2: MacAddress = "aa-bb-cc-dd-ee-ff".parse().unwrap();
/// assert_eq!(mac, mac2);
///
/// // Mixed separators are rejected.
/// assert!("aa:bb-cc:dd:ee:ff".parse::<MacAddress>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// The broadcast MAC address (ff:ff:ff:ff:ff:ff).
    pub const BROADCAST: MacAddress = MacAddress([0xff; 6]);

    /// The all-zero MAC address.
    pub const ZERO: MacAddress = MacAddress([0; 6]);

    pub const fn new(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Returns true if the group bit of the first octet is set.
    pub const fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    /// Returns true if the locally-administered bit of the first octet is set.
    pub const fn is_local(&self) -> bool {
        self.0[0] & 0x02 != 0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for MacAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_mac_syntax(s) {
            return Err(ParseError::InvalidMacAddress(s.to_string()));
        }

        let mut bytes = [0u8; 6];
        for (slot, part) in bytes.iter_mut().zip(s.split([':', '-'])) {
            *slot = u8::from_str_radix(part, 16)
                .map_err(|_| ParseError::InvalidMacAddress(s.to_string()))?;
        }

        Ok(MacAddress(bytes))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> String {
        mac.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_colon_format() {
        let mac: MacAddress = "00:11:22:33:44:55".parse().unwrap();
        assert_eq!(mac.as_bytes(), &[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    }

    #[test]
    fn test_parse_hyphen_format_mixed_case() {
        let mac: MacAddress = "Aa-bB-cc-DD-ee-FF".parse().unwrap();
        assert_eq!(mac.as_bytes(), &[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
    }

    #[test]
    fn test_display_is_lowercase_colon() {
        let mac = MacAddress::new([0xAA, 0xBB, 0xCC, 0x0D, 0xEE, 0xFF]);
        assert_eq!(mac.to_string(), "aa:bb:cc:0d:ee:ff");
    }

    #[test]
    fn test_multicast_and_local_bits() {
        assert!(MacAddress::BROADCAST.is_multicast());
        assert!("02:00:00:00:00:01".parse::<MacAddress>().unwrap().is_local());
        assert!(!MacAddress::ZERO.is_multicast());
    }

    #[test]
    fn test_invalid_format() {
        assert!("invalid".parse::<MacAddress>().is_err());
        assert!("00:11:22:33:44".parse::<MacAddress>().is_err());
        assert!("00:11:22:33:44:55:66".parse::<MacAddress>().is_err());
        assert!("gg:11:22:33:44:55".parse::<MacAddress>().is_err());
        assert!("0:11:22:33:44:55".parse::<MacAddress>().is_err());
        assert!("00:11-22:33:44:55".parse::<MacAddress>().is_err());
        assert!(" 00:11:22:33:44:55".parse::<MacAddress>().is_err());
    }

    #[test]
    fn test_serde_roundtrip_through_string() {
        let mac: MacAddress = serde_json::from_str("\"aa:bb:cc:dd:ee:ff\"").unwrap();
        assert_eq!(serde_json::to_string(&mac).unwrap(), "\"aa:bb:cc:dd:ee:ff\"");
        assert!(serde_json::from_str::<MacAddress>("\"nope\"").is_err());
    }
}
