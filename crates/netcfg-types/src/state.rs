//! Link and neighbor state types.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Requested administrative state for `ip link set <dev> {up|down}`.
///
/// Parsing is exact: only the lowercase tokens `up` and `down` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminState {
    Up,
    Down,
}

impl AdminState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AdminState::Up => "up",
            AdminState::Down => "down",
        }
    }
}

impl fmt::Display for AdminState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminState {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(AdminState::Up),
            "down" => Ok(AdminState::Down),
            _ => Err(ParseError::InvalidAdminState(s.to_string())),
        }
    }
}

/// Operational state as reported in the `operstate` field of `ip -j link`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperState {
    Up,
    Down,
    /// Anything else the tool reports (`UNKNOWN`, `DORMANT`, `LOWERLAYERDOWN`, ...).
    Other(String),
}

impl OperState {
    /// Maps the tool's text to a state. Never fails.
    pub fn from_report(s: &str) -> Self {
        if s.eq_ignore_ascii_case("up") {
            OperState::Up
        } else if s.eq_ignore_ascii_case("down") {
            OperState::Down
        } else {
            OperState::Other(s.to_string())
        }
    }

    pub const fn is_up(&self) -> bool {
        matches!(self, OperState::Up)
    }
}

impl fmt::Display for OperState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperState::Up => f.write_str("UP"),
            OperState::Down => f.write_str("DOWN"),
            OperState::Other(s) => f.write_str(s),
        }
    }
}

/// Neighbor entry type passed as `nud <type>` to `ip neigh add|replace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NudState {
    #[default]
    Permanent,
    NoArp,
    Reachable,
    Stale,
    Probe,
    Delay,
    Failed,
}

impl NudState {
    pub const ALL: [NudState; 7] = [
        NudState::Permanent,
        NudState::NoArp,
        NudState::Reachable,
        NudState::Stale,
        NudState::Probe,
        NudState::Delay,
        NudState::Failed,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            NudState::Permanent => "permanent",
            NudState::NoArp => "noarp",
            NudState::Reachable => "reachable",
            NudState::Stale => "stale",
            NudState::Probe => "probe",
            NudState::Delay => "delay",
            NudState::Failed => "failed",
        }
    }
}

impl fmt::Display for NudState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NudState {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NudState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ParseError::InvalidNudState(s.to_string()))
    }
}
