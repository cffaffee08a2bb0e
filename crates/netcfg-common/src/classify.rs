//! Classification of `ip` diagnostics into [`NetCfgError`] kinds.
//!
//! The tool reports failures as free text on stderr. A [`Classifier`] holds
//! an ordered table of substring [`Rule`]s; the first rule that applies to
//! the operation and whose pattern occurs in the diagnostic decides the
//! error. Anything unmatched becomes [`NetCfgError::Execution`] with the
//! raw text attached.
//!
//! Patterns mirror the English phrasing of current iproute2 releases.
//! [`ProcessRunner`](crate::ProcessRunner) pins `LC_ALL=C` to keep them stable.

use std::borrow::Cow;
use std::fmt;

use crate::error::NetCfgError;
use crate::shell::{ExecResult, IpCommand};

/// Facade operation a command was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    AddressShow,
    AddressAdd,
    AddressRemove,
    AddressFlush,
    LinkShow,
    LinkSetState,
    LinkSetMtu,
    LinkRename,
    LinkSetMac,
    NeighborShow,
    NeighborAdd,
    NeighborUpdate,
    NeighborRemove,
    NeighborFlush,
}

impl OpKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OpKind::AddressShow => "address show",
            OpKind::AddressAdd => "address add",
            OpKind::AddressRemove => "address remove",
            OpKind::AddressFlush => "address flush",
            OpKind::LinkShow => "link show",
            OpKind::LinkSetState => "link set state",
            OpKind::LinkSetMtu => "link set mtu",
            OpKind::LinkRename => "link rename",
            OpKind::LinkSetMac => "link set mac",
            OpKind::NeighborShow => "neighbor show",
            OpKind::NeighborAdd => "neighbor add",
            OpKind::NeighborUpdate => "neighbor update",
            OpKind::NeighborRemove => "neighbor remove",
            OpKind::NeighborFlush => "neighbor flush",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error kind a matching rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    DeviceNotFound,
    DuplicateResource,
    ResourceNotFound,
}

/// One substring rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pattern: Cow<'static, str>,
    ops: Option<Vec<OpKind>>,
    verdict: Verdict,
}

impl Rule {
    /// A rule that applies to every operation.
    pub fn new(pattern: impl Into<Cow<'static, str>>, verdict: Verdict) -> Self {
        Self {
            pattern: pattern.into(),
            ops: None,
            verdict,
        }
    }

    /// Restricts the rule to the given operations.
    pub fn only(mut self, ops: &[OpKind]) -> Self {
        self.ops = Some(ops.to_vec());
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Returns true if this rule decides `diagnostic` for `op`.
    pub fn matches(&self, op: OpKind, diagnostic: &str) -> bool {
        let applies = self.ops.as_ref().map_or(true, |ops| ops.contains(&op));
        applies && diagnostic.contains(self.pattern.as_ref())
    }
}

/// What a failed call was trying to do, used to fill in error details.
#[derive(Debug, Clone)]
pub struct CallContext {
    /// The facade operation.
    pub op: OpKind,
    /// The command that was run.
    pub command: IpCommand,
    /// The interface the call targeted (empty for unscoped calls).
    pub device: String,
    /// The resource being added or removed, e.g. "address 10.0.0.1/24".
    pub resource: Option<String>,
}

impl CallContext {
    pub fn new(op: OpKind, command: IpCommand, device: impl Into<String>) -> Self {
        Self {
            op,
            command,
            device: device.into(),
            resource: None,
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    fn resource_label(&self) -> String {
        self.resource
            .clone()
            .unwrap_or_else(|| self.command.to_string())
    }
}

/// Ordered diagnostic-to-error table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Default for Classifier {
    /// The built-in table for iproute2 diagnostics.
    fn default() -> Self {
        Self {
            rules: vec![
                Rule::new("Cannot find device", Verdict::DeviceNotFound),
                // `ip address show <dev>`: Device "<dev>" does not exist.
                Rule::new("does not exist", Verdict::DeviceNotFound),
                Rule::new("File exists", Verdict::DuplicateResource)
                    .only(&[OpKind::AddressAdd, OpKind::NeighborAdd]),
                Rule::new("Cannot assign requested address", Verdict::ResourceNotFound)
                    .only(&[OpKind::AddressRemove]),
                Rule::new("No such file or directory", Verdict::ResourceNotFound)
                    .only(&[OpKind::NeighborRemove]),
            ],
        }
    }
}

impl Classifier {
    /// A classifier with no rules; every failure becomes `Execution`.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule, checked after the existing ones.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Inserts a rule ahead of the existing ones.
    pub fn with_priority_rule(mut self, rule: Rule) -> Self {
        self.rules.insert(0, rule);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the verdict of the first matching rule, if any.
    pub fn verdict(&self, op: OpKind, diagnostic: &str) -> Option<Verdict> {
        self.rules
            .iter()
            .find(|rule| rule.matches(op, diagnostic))
            .map(Rule::verdict)
    }

    /// Builds the error for a failed invocation.
    pub fn classify(&self, ctx: &CallContext, result: &ExecResult) -> NetCfgError {
        let diagnostic = result.diagnostic();

        match self.verdict(ctx.op, diagnostic) {
            Some(Verdict::DeviceNotFound) => NetCfgError::device_not_found(ctx.device.clone()),
            Some(Verdict::DuplicateResource) => NetCfgError::DuplicateResource {
                resource: ctx.resource_label(),
                device: ctx.device.clone(),
            },
            Some(Verdict::ResourceNotFound) => NetCfgError::ResourceNotFound {
                resource: ctx.resource_label(),
                device: ctx.device.clone(),
            },
            None => NetCfgError::Execution {
                command: ctx.command.to_string(),
                exit_code: result.exit_code,
                diagnostic: diagnostic.to_string(),
            },
        }
    }

    /// Passes successful output through and classifies failures.
    pub fn check(&self, ctx: &CallContext, result: ExecResult) -> Result<String, NetCfgError> {
        if result.failed() {
            let err = self.classify(ctx, &result);
            tracing::debug!(op = %ctx.op, device = %ctx.device, error = %err, "Classified failure");
            Err(err)
        } else {
            Ok(result.stdout)
        }
    }
}
