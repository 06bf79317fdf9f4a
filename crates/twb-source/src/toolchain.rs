//! Toolchain presence probe.
//!
//! Verifies that the Rust toolchain launcher is installed and answers its
//! version query. Presence is an environment precondition, checked once per
//! pipeline run; nothing is retried here and nothing is installed.

use thiserror::Error;

use crate::exec;

/// Errors from probing the toolchain.
#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("`{command}` was not found on PATH; a Rust toolchain is required to build from source")]
    Missing { command: String },

    #[error("`{command} --version` failed: {message}")]
    Broken { command: String, message: String },
}

/// Checks that the toolchain launcher resolves and runs.
#[derive(Debug, Clone)]
pub struct ToolchainProbe {
    command: String,
}

impl ToolchainProbe {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Resolve the launcher on the search path and run its version query.
    ///
    /// On success the detected version is logged; no state is mutated.
    pub fn check(&self) -> Result<(), ToolchainError> {
        let resolved = which::which(&self.command).map_err(|_| ToolchainError::Missing {
            command: self.command.clone(),
        })?;

        let output =
            exec::run(&self.command, &["--version"], None).map_err(|e| ToolchainError::Broken {
                command: self.command.clone(),
                message: e.to_string(),
            })?;

        if !output.success() {
            return Err(ToolchainError::Broken {
                command: self.command.clone(),
                message: output.combined(),
            });
        }

        tracing::info!(
            command = %self.command,
            path = %resolved.display(),
            version = %output.stdout.trim(),
            "toolchain detected"
        );

        Ok(())
    }
}
