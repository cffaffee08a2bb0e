//! Invocation infrastructure shared by the netcfg facades.
//!
//! - [`shell`]: the `ip` argument vector ([`IpCommand`]), the
//!   [`CommandRunner`] seam and its process-backed implementation
//! - [`config`]: runner configuration (binary path, locale pinning)
//! - [`error`]: the [`NetCfgError`] taxonomy
//! - [`classify`]: mapping of `ip` diagnostics onto that taxonomy
//!
//! # Example
//!
//! ```ignore
//! use netcfg_common::{CommandRunner, IpCommand, ProcessRunner, RunnerConfig};
//!
//! let runner = ProcessRunner::new(RunnerConfig::from_env());
//! let cmd = IpCommand::new().arg("link").arg("set").arg("eth0").arg("up");
//! let result = runner.run(&cmd).await?;
//! if result.failed() {
//!     eprintln!("{}", result.diagnostic());
//! }
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod shell;

pub use classify::{CallContext, Classifier, OpKind, Rule, Verdict};
pub use config::RunnerConfig;
pub use error::{ErrorKind, NetCfgError, NetCfgResult};
pub use shell::{CommandRunner, ExecResult, IpCommand, ProcessRunner};
