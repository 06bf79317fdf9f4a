//! Release build of the fetched source tree.

use camino::Utf8Path;
use thiserror::Error;

use crate::exec;

/// Errors from the release build.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("release build failed: {message}")]
    CompileFailed { message: String },
}

/// Runs the toolchain's release build inside a working directory.
#[derive(Debug, Clone)]
pub struct Compiler {
    toolchain_command: String,
}

impl Compiler {
    pub fn new(toolchain_command: impl Into<String>) -> Self {
        Self {
            toolchain_command: toolchain_command.into(),
        }
    }

    /// Build the source tree in release mode.
    ///
    /// The invocation is scoped to `workdir` via the child's working
    /// directory, never a global chdir. The build always targets the host
    /// platform; `target` is carried for artifact naming and search only.
    /// Output lands under `<workdir>/target/release`, with a layout dictated
    /// by the toolchain.
    pub fn compile(&self, workdir: &Utf8Path, target: &str) -> Result<(), CompileError> {
        tracing::info!(%target, workdir = %workdir, "compiling release build");

        let output = exec::run(
            &self.toolchain_command,
            &["build", "--release"],
            Some(workdir),
        )
        .map_err(|e| CompileError::CompileFailed {
            message: e.to_string(),
        })?;

        if !output.success() {
            return Err(CompileError::CompileFailed {
                message: output.combined(),
            });
        }

        tracing::debug!(workdir = %workdir, "release build finished");
        Ok(())
    }
}
