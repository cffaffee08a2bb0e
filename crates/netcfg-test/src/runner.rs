//! Scripted command runner.

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use async_trait::async_trait;
use netcfg_common::{CommandRunner, ExecResult, IpCommand, NetCfgError, NetCfgResult};

use crate::lock;

#[derive(Debug)]
enum Response {
    Exec(ExecResult),
    SpawnError(io::ErrorKind),
}

/// A [`CommandRunner`] that records every command and replays queued
/// responses in order.
///
/// Once the queue is empty every command succeeds with no output.
#[derive(Debug, Default)]
pub struct FakeRunner {
    responses: Mutex<VecDeque<Response>>,
    captured_commands: Mutex<Vec<IpCommand>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn respond(self, result: ExecResult) -> Self {
        lock(&self.responses).push_back(Response::Exec(result));
        self
    }

    /// Queues a successful response with `stdout`.
    pub fn respond_ok(self, stdout: impl Into<String>) -> Self {
        self.respond(ExecResult::new(0, stdout, ""))
    }

    /// Queues a failure to start the tool.
    pub fn fail_spawn(self, kind: io::ErrorKind) -> Self {
        lock(&self.responses).push_back(Response::SpawnError(kind));
        self
    }

    /// Queues a response on a shared runner.
    pub fn push(&self, result: ExecResult) {
        lock(&self.responses).push_back(Response::Exec(result));
    }

    /// Commands run so far, oldest first.
    pub fn commands(&self) -> Vec<IpCommand> {
        lock(&self.captured_commands).clone()
    }

    /// Commands run so far, rendered as command lines.
    pub fn lines(&self) -> Vec<String> {
        lock(&self.captured_commands)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    pub fn last_line(&self) -> Option<String> {
        lock(&self.captured_commands).last().map(ToString::to_string)
    }

    /// Argument vector of the most recent command.
    pub fn last_argv(&self) -> Option<Vec<String>> {
        lock(&self.captured_commands)
            .last()
            .map(|cmd| cmd.argv().to_vec())
    }

    pub fn clear(&self) {
        lock(&self.captured_commands).clear();
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, cmd: &IpCommand) -> NetCfgResult<ExecResult> {
        lock(&self.captured_commands).push(cmd.clone());

        match lock(&self.responses).pop_front() {
            Some(Response::Exec(result)) => Ok(result),
            Some(Response::SpawnError(kind)) => Err(NetCfgError::Invocation {
                command: cmd.to_string(),
                source: io::Error::from(kind),
            }),
            None => Ok(ExecResult::default()),
        }
    }
}
