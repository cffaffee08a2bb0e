//! Error types for netcfg operations.
//!
//! Every facade call either succeeds or reports exactly one of these.
//! All errors implement `std::error::Error` via `thiserror`.

use std::io;
use thiserror::Error;

/// Result type alias for netcfg operations.
pub type NetCfgResult<T> = Result<T, NetCfgError>;

/// Errors that can occur during netcfg operations.
#[derive(Debug, Error)]
pub enum NetCfgError {
    /// Malformed input, caught before `ip` is invoked.
    #[error("{message}")]
    Validation {
        /// The offending parameter (e.g. "ip_cidr", "state").
        param: &'static str,
        /// Human-readable message, e.g. "Invalid IP CIDR: 300.1.1.1/24".
        message: String,
    },

    /// The named interface does not exist.
    #[error("Cannot find device {device}")]
    DeviceNotFound {
        /// The interface the call targeted.
        device: String,
    },

    /// The address or neighbor being added already exists.
    #[error("{resource} already exists on {device}")]
    DuplicateResource {
        /// The resource being added (e.g. "address 10.0.0.1/24").
        resource: String,
        /// The interface the call targeted.
        device: String,
    },

    /// The address or neighbor being removed does not exist.
    #[error("{resource} does not exist on {device}")]
    ResourceNotFound {
        /// The resource being removed.
        resource: String,
        /// The interface the call targeted.
        device: String,
    },

    /// A query succeeded but its output was not a JSON array of records.
    #[error("Error parsing {what}: {source}")]
    Parse {
        /// What was being parsed (e.g. "network interfaces").
        what: &'static str,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The tool failed with a diagnostic no classification rule matched.
    #[error("Command failed: '{command}' (exit code {exit_code}): {diagnostic}")]
    Execution {
        /// The command line that failed.
        command: String,
        /// The exit code.
        exit_code: i32,
        /// Raw diagnostic text (may be empty).
        diagnostic: String,
    },

    /// The tool could not be started at all.
    #[error("Failed to execute '{command}': {source}")]
    Invocation {
        /// The command line that could not be started.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Discriminant of [`NetCfgError`] for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    DeviceNotFound,
    DuplicateResource,
    ResourceNotFound,
    Parse,
    Execution,
    Invocation,
}

impl NetCfgError {
    /// Creates a validation error.
    pub fn validation(param: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            param,
            message: message.into(),
        }
    }

    /// Creates a device-not-found error.
    pub fn device_not_found(device: impl Into<String>) -> Self {
        Self::DeviceNotFound {
            device: device.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NetCfgError::Validation { .. } => ErrorKind::Validation,
            NetCfgError::DeviceNotFound { .. } => ErrorKind::DeviceNotFound,
            NetCfgError::DuplicateResource { .. } => ErrorKind::DuplicateResource,
            NetCfgError::ResourceNotFound { .. } => ErrorKind::ResourceNotFound,
            NetCfgError::Parse { .. } => ErrorKind::Parse,
            NetCfgError::Execution { .. } => ErrorKind::Execution,
            NetCfgError::Invocation { .. } => ErrorKind::Invocation,
        }
    }

    /// Returns true if the input was rejected before invocation.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Returns true if the device or resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::DeviceNotFound | ErrorKind::ResourceNotFound
        )
    }

    /// Returns true if the tool could not be started; nothing else will work either.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Invocation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validation_display_is_message() {
        let err = NetCfgError::validation("ip_cidr", "Invalid IP CIDR: 300.1.1.1/24");
        assert_eq!(err.to_string(), "Invalid IP CIDR: 300.1.1.1/24");
        assert!(err.is_validation());
    }

    #[test]
    fn test_device_not_found_display() {
        let err = NetCfgError::device_not_found("doesnotexist");
        assert_eq!(err.to_string(), "Cannot find device doesnotexist");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_execution_display() {
        let err = NetCfgError::Execution {
            command: "ip link set dev eth0 mtu 100000".to_string(),
            exit_code: 2,
            diagnostic: "Error: mtu greater than device maximum.".to_string(),
        };
        assert!(err.to_string().contains("exit code 2"));
        assert!(err.to_string().contains("mtu greater than device maximum"));
        assert_eq!(err.kind(), ErrorKind::Execution);
    }

    #[test]
    fn test_parse_error_has_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = NetCfgError::Parse {
            what: "network links",
            source,
        };
        assert!(err.to_string().starts_with("Error parsing network links: "));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invocation_is_fatal() {
        let err = NetCfgError::Invocation {
            command: "ip link".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.is_fatal());
        assert!(!err.is_not_found());
    }
}
