//! Typed async facade over the `ip` tool.
//!
//! `netcfg` inspects and changes interfaces, their addresses and the
//! neighbor table by running `ip` and interpreting what it prints:
//!
//! 1. Validate caller input (CIDR, MTU, MAC, IP, state tokens); bad input
//!    never reaches the tool
//! 2. Build the `ip` argument vector ([`commands`])
//! 3. Run it through a [`CommandRunner`]
//! 4. Decode JSON query output ([`records`]) or classify the diagnostic
//!    ([`Classifier`]) into a [`NetCfgError`]
//!
//! # Example
//!
//! ```ignore
//! use netcfg::NetCfg;
//!
//! let net = NetCfg::from_env();
//! net.addr().add("eth0", "10.0.0.5/24").await?;
//! net.link().set_state("eth0", "up").await?;
//! for iface in net.addr().show(Some("eth0")).await? {
//!     println!("{:?}", iface.cidrs());
//! }
//! ```
//!
//! # Concurrency
//!
//! [`NetCfg`] holds no mutable state and can be cloned freely. Concurrent
//! calls are not ordered with respect to each other; callers that need
//! ordering must await one call before issuing the next. There is no
//! timeout: a hung `ip` leaves the call pending.

pub mod address;
pub mod commands;
pub mod link;
pub mod neighbor;
pub mod records;
mod require;

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

pub use address::Addresses;
pub use link::Links;
pub use neighbor::Neighbors;
pub use netcfg_common::{
    CallContext, Classifier, CommandRunner, ErrorKind, ExecResult, IpCommand, NetCfgError,
    NetCfgResult, OpKind, ProcessRunner, Rule, RunnerConfig, Verdict,
};
pub use netcfg_types::{validate, AdminState, IpPrefix, MacAddress, NudState, OperState};
pub use records::{AddrInfo, InterfaceAddresses, InterfaceRecord, Link, Neighbor, Record};

/// Entry point to the address, link and neighbor facades.
#[derive(Clone)]
pub struct NetCfg {
    runner: Arc<dyn CommandRunner>,
    classifier: Arc<Classifier>,
}

impl NetCfg {
    /// Creates a client that runs the `ip` binary described by `config`.
    pub fn new(config: RunnerConfig) -> Self {
        Self::with_runner(Arc::new(ProcessRunner::new(config)))
    }

    /// Creates a client configured from `NETCFG_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(RunnerConfig::from_env())
    }

    /// Creates a client around any runner (e.g. a fake in tests).
    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            classifier: Arc::new(Classifier::default()),
        }
    }

    /// Replaces the diagnostic classification table.
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Address operations (`ip address`).
    pub fn addr(&self) -> Addresses<'_> {
        Addresses::new(self)
    }

    /// Interface operations (`ip link`).
    pub fn link(&self) -> Links<'_> {
        Links::new(self)
    }

    /// Neighbor table operations (`ip neigh`).
    pub fn neigh(&self) -> Neighbors<'_> {
        Neighbors::new(self)
    }

    /// Runs one command and returns its stdout, or the classified failure.
    pub(crate) async fn execute(&self, ctx: &CallContext) -> NetCfgResult<String> {
        let result = self.runner.run(&ctx.command).await?;
        self.classifier.check(ctx, result)
    }

    /// Runs one query and decodes its JSON output.
    pub(crate) async fn query<T: DeserializeOwned>(
        &self,
        what: &'static str,
        ctx: &CallContext,
    ) -> NetCfgResult<Vec<T>> {
        let stdout = self.execute(ctx).await?;
        records::parse_records(what, &stdout)
    }
}

impl Default for NetCfg {
    fn default() -> Self {
        Self::new(RunnerConfig::default())
    }
}

impl fmt::Debug for NetCfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetCfg")
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcfg_test::{fixtures, FakeRunner};
    use pretty_assertions::assert_eq;
    use std::io;

    #[tokio::test]
    async fn test_missing_tool_is_fatal() {
        let runner = Arc::new(FakeRunner::new().fail_spawn(io::ErrorKind::NotFound));
        let err = NetCfg::with_runner(runner)
            .link()
            .show(None)
            .await
            .unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(err.kind(), ErrorKind::Invocation);
    }

    #[tokio::test]
    async fn test_custom_classifier_rule() {
        let runner = Arc::new(
            FakeRunner::new().respond(fixtures::rtnetlink_failure(fixtures::NOT_PERMITTED)),
        );
        let net = NetCfg::with_runner(runner).with_classifier(
            Classifier::default()
                .with_rule(Rule::new("Operation not permitted", Verdict::ResourceNotFound)),
        );

        let err = net.addr().flush("eth0").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
    }

    #[tokio::test]
    async fn test_malformed_output_is_parse_error() {
        let runner = Arc::new(FakeRunner::new().respond_ok("{not json"));
        let err = NetCfg::with_runner(runner)
            .neigh()
            .show(None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().starts_with("Error parsing network neighbors"));
    }

    #[tokio::test]
    async fn test_stderr_with_zero_exit_is_failure() {
        let runner = Arc::new(FakeRunner::new().respond(ExecResult::new(
            0,
            fixtures::LINK_SHOW_ALL,
            "Warning: unexpected attribute",
        )));
        let err = NetCfg::with_runner(runner)
            .link()
            .show(None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Execution);
    }

    #[test]
    fn test_client_is_cloneable_and_debuggable() {
        let net = NetCfg::with_runner(Arc::new(FakeRunner::new()));
        let clone = net.clone();
        assert!(format!("{clone:?}").starts_with("NetCfg"));
        assert_eq!(clone.classifier(), net.classifier());
    }
}
