//! `ip` command construction and execution.
//!
//! Commands are argument vectors handed straight to the `ip` binary; no
//! shell is involved, so caller-supplied tokens are never interpreted.
//! [`shellquote`] is only used to render a copy-pasteable command line for
//! logs and error messages.
//!
//! # Example
//!
//! ```ignore
//! use netcfg_common::shell::{CommandRunner, IpCommand, ProcessRunner};
//!
//! let cmd = IpCommand::new().args(["link", "set", "dev", "eth0", "mtu", "9000"]);
//! let result = ProcessRunner::default().run(&cmd).await?;
//! ```

use std::fmt;
use std::process::Stdio;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;

use crate::config::{RunnerConfig, DEFAULT_IP_CMD};
use crate::error::{NetCfgError, NetCfgResult};

/// Regex for characters that need escaping in shell double-quotes.
/// Matches: $, `, ", \, and newline
static SHELL_ESCAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([$`"\\\n])"#).expect("Invalid regex pattern"));

/// Arguments made only of these characters are rendered unquoted.
static SHELL_SAFE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_./:@%+=,-]+$").expect("Invalid regex pattern"));

/// Quotes a string for display as a shell word.
///
/// Wraps the string in double quotes and escapes `$`, `` ` ``, `"`, `\`
/// and newline.
///
/// ```
/// use netcfg_common::shell::shellquote;
///
/// assert_eq!(shellquote("simple"), "\"simple\"");
/// assert_eq!(shellquote("with$var"), "\"with\\$var\"");
/// ```
pub fn shellquote(s: &str) -> String {
    let escaped = SHELL_ESCAPE_RE.replace_all(s, r"\$1");
    format!("\"{}\"", escaped)
}

/// Renders one argument, quoting only when needed.
fn display_arg(arg: &str) -> String {
    if SHELL_SAFE_RE.is_match(arg) {
        arg.to_string()
    } else {
        shellquote(arg)
    }
}

/// An `ip` invocation, minus the program path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpCommand {
    args: Vec<String>,
}

impl IpCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Returns the argument vector passed to the binary.
    pub fn argv(&self) -> &[String] {
        &self.args
    }

    /// Renders the full command line with the given program name.
    pub fn command_line(&self, program: &str) -> String {
        std::iter::once(display_arg(program))
            .chain(self.args.iter().map(|a| display_arg(a)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for IpCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line(DEFAULT_IP_CMD))
    }
}

/// Result of one `ip` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// Exit code of the process (0 = success, -1 if killed by a signal).
    pub exit_code: i32,
    /// Standard output, trimmed.
    pub stdout: String,
    /// Standard error, trimmed.
    pub stderr: String,
}

impl ExecResult {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Returns true if the command exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns true if the tool reported a failure.
    ///
    /// Any diagnostic text counts, even with a zero exit code.
    pub fn failed(&self) -> bool {
        !self.success() || !self.stderr.is_empty()
    }

    /// Returns the diagnostic text (stderr).
    pub fn diagnostic(&self) -> &str {
        &self.stderr
    }
}

/// Executes `ip` commands.
///
/// Ordinary command failures (non-zero exit, diagnostic text) come back
/// inside `Ok(ExecResult)`. `Err` is reserved for the tool not starting at
/// all, reported as [`NetCfgError::Invocation`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, cmd: &IpCommand) -> NetCfgResult<ExecResult>;
}

/// [`CommandRunner`] that spawns the configured `ip` binary.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    config: RunnerConfig,
}

impl ProcessRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    fn program(&self) -> String {
        self.config.ip_cmd.to_string_lossy().into_owned()
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, cmd: &IpCommand) -> NetCfgResult<ExecResult> {
        let command_line = cmd.command_line(&self.program());
        tracing::debug!(command = %command_line, "Executing ip command");

        let mut command = Command::new(&self.config.ip_cmd);
        command
            .args(cmd.argv())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if self.config.force_c_locale {
            command.env("LC_ALL", "C");
        }

        let output = command
            .output()
            .await
            .map_err(|e| NetCfgError::Invocation {
                command: command_line.clone(),
                source: e,
            })?;

        let result = ExecResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        };

        if result.failed() {
            tracing::warn!(
                command = %command_line,
                exit_code = result.exit_code,
                stderr = %result.stderr,
                "Command failed"
            );
        } else {
            tracing::trace!(command = %command_line, "Command succeeded");
        }

        Ok(result)
    }
}
