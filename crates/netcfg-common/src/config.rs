//! Runner configuration.

use std::path::PathBuf;

/// Default `ip` binary, resolved through `PATH`.
pub const DEFAULT_IP_CMD: &str = "ip";

/// Environment variable overriding the `ip` binary path.
pub const IP_CMD_ENV: &str = "NETCFG_IP_CMD";

/// Environment variable that, when set to anything but `0`/`false`, keeps
/// the caller's locale instead of forcing `LC_ALL=C`.
pub const KEEP_LOCALE_ENV: &str = "NETCFG_KEEP_LOCALE";

/// How [`ProcessRunner`](crate::ProcessRunner) launches the `ip` tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Path or name of the `ip` binary.
    pub ip_cmd: PathBuf,

    /// Run the tool with `LC_ALL=C`.
    ///
    /// Diagnostic classification matches English phrases, so this is on
    /// unless explicitly disabled.
    pub force_c_locale: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            ip_cmd: PathBuf::from(DEFAULT_IP_CMD),
            force_c_locale: true,
        }
    }
}

impl RunnerConfig {
    /// Builds a configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(IP_CMD_ENV).filter(|p| !p.trim().is_empty()) {
            config.ip_cmd = PathBuf::from(path.trim());
        }

        if let Some(keep) = lookup(KEEP_LOCALE_ENV) {
            let keep = keep.trim();
            config.force_c_locale = keep == "0" || keep.eq_ignore_ascii_case("false");
        }

        config
    }

    pub fn with_ip_cmd(mut self, ip_cmd: impl Into<PathBuf>) -> Self {
        self.ip_cmd = ip_cmd.into();
        self
    }

    pub fn with_force_c_locale(mut self, force: bool) -> Self {
        self.force_c_locale = force;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::default();
        assert_eq!(config.ip_cmd, PathBuf::from("ip"));
        assert!(config.force_c_locale);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = RunnerConfig::from_lookup(lookup(&[
            (IP_CMD_ENV, "/usr/sbin/ip"),
            (KEEP_LOCALE_ENV, "1"),
        ]));
        assert_eq!(config.ip_cmd, PathBuf::from("/usr/sbin/ip"));
        assert!(!config.force_c_locale);
    }

    #[test]
    fn test_from_lookup_ignores_blank_and_false() {
        let config = RunnerConfig::from_lookup(lookup(&[
            (IP_CMD_ENV, "   "),
            (KEEP_LOCALE_ENV, "false"),
        ]));
        assert_eq!(config, RunnerConfig::default());
    }

    #[test]
    fn test_builders() {
        let config = RunnerConfig::default()
            .with_ip_cmd("/sbin/ip")
            .with_force_c_locale(false);
        assert_eq!(config.ip_cmd, PathBuf::from("/sbin/ip"));
        assert!(!config.force_c_locale);
    }
}
