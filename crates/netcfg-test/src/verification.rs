//! Verification helpers for testing netcfg
//!
//! Asserts on the command log captured by `FakeRunner` or `SimulatedHost`.

use thiserror::Error;

/// Verification error types
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Expected a command containing '{expected}', got {actual:?}")]
    CommandMissing { expected: String, actual: Vec<String> },

    #[error("Unexpected command containing '{pattern}': '{command}'")]
    UnexpectedCommand { pattern: String, command: String },

    #[error("Expected {expected} commands, found {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Expected '{first}' before '{second}'")]
    OrderMismatch { first: String, second: String },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Command execution verifier
pub struct CommandVerifier {
    captured_commands: Vec<String>,
}

impl CommandVerifier {
    /// Create a new command verifier from rendered command lines
    pub fn new(captured_commands: Vec<String>) -> Self {
        Self { captured_commands }
    }

    fn position(&self, pattern: &str) -> Option<usize> {
        self.captured_commands
            .iter()
            .position(|cmd| cmd.contains(pattern))
    }

    /// Verify that a matching command was executed
    pub fn assert_command_executed(&self, expected: &str) -> VerifyResult<()> {
        match self.position(expected) {
            Some(_) => Ok(()),
            None => Err(VerificationError::CommandMissing {
                expected: expected.to_string(),
                actual: self.captured_commands.clone(),
            }),
        }
    }

    /// Verify that no matching command was executed
    pub fn assert_command_not_executed(&self, pattern: &str) -> VerifyResult<()> {
        match self.position(pattern) {
            Some(i) => Err(VerificationError::UnexpectedCommand {
                pattern: pattern.to_string(),
                command: self.captured_commands[i].clone(),
            }),
            None => Ok(()),
        }
    }

    /// Verify the number of commands executed
    pub fn assert_command_count(&self, expected: usize) -> VerifyResult<()> {
        let actual = self.captured_commands.len();
        if actual != expected {
            return Err(VerificationError::CountMismatch { expected, actual });
        }
        Ok(())
    }

    /// Verify that the first match of `first` precedes the first match of `second`
    pub fn assert_command_order(&self, first: &str, second: &str) -> VerifyResult<()> {
        self.assert_command_executed(first)?;
        self.assert_command_executed(second)?;
        match (self.position(first), self.position(second)) {
            (Some(a), Some(b)) if a < b => Ok(()),
            _ => Err(VerificationError::OrderMismatch {
                first: first.to_string(),
                second: second.to_string(),
            }),
        }
    }

    /// Get all captured commands
    pub fn captured_commands(&self) -> &[String] {
        &self.captured_commands
    }
}
