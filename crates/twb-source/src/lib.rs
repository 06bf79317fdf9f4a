//! twb-source: build the Tailwind standalone binary from upstream source.
//!
//! Fallback path for platforms without a prebuilt release asset. The pipeline
//! verifies the Rust toolchain, clones the pinned release tag, runs a release
//! build, and finds the produced executable. On success the caller consumes
//! the artifact (e.g. copies it to an install location) and then disposes of
//! the working directory via [`cleanup`]; disposal is never automatic.

pub mod compile;
pub mod exec;
pub mod fetch;
pub mod locate;
pub mod toolchain;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

pub use compile::{CompileError, Compiler};
pub use fetch::{FetchError, SourceFetcher};
pub use locate::{ArtifactLocator, ExeNaming};
pub use toolchain::{ToolchainError, ToolchainProbe};

/// Pipeline stage, used to tag failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ProbingToolchain,
    Fetching,
    Compiling,
    Locating,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::ProbingToolchain => "probing toolchain",
            Stage::Fetching => "fetching source",
            Stage::Compiling => "compiling",
            Stage::Locating => "locating artifact",
        };
        f.write_str(s)
    }
}

/// Errors from [`SourcePipeline::build`].
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("toolchain check failed: {0}")]
    Toolchain(#[from] ToolchainError),

    #[error("source fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("compilation failed: {0}")]
    Compile(#[from] CompileError),

    #[error("build succeeded but no matching executable was found under {dir}")]
    ArtifactNotFound { dir: Utf8PathBuf },
}

impl BuildError {
    /// The stage this error occurred in.
    pub fn stage(&self) -> Stage {
        match self {
            BuildError::Toolchain(_) => Stage::ProbingToolchain,
            BuildError::Fetch(_) => Stage::Fetching,
            BuildError::Compile(_) => Stage::Compiling,
            BuildError::ArtifactNotFound { .. } => Stage::Locating,
        }
    }
}

/// A successful source build.
///
/// The working directory still exists; ownership of its disposal transfers
/// to the caller, who calls [`cleanup`] after consuming the artifact.
#[derive(Debug)]
pub struct BuildOutput {
    /// Path of the compiled product executable inside the working directory.
    pub artifact: Utf8PathBuf,
    /// The working directory holding source and build output.
    pub workdir: Utf8PathBuf,
}

/// Knobs for one pipeline instance. Defaults are the production values.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Upstream repository to clone.
    pub repo_url: String,
    /// Clone tool, resolved via the search path.
    pub git_command: String,
    /// Toolchain launcher, resolved via the search path.
    pub toolchain_command: String,
    /// Root under which working directories are created.
    pub temp_root: Utf8PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let temp_root = Utf8PathBuf::from_path_buf(std::env::temp_dir()).unwrap_or_else(|raw| {
            let fallback = if cfg!(windows) {
                r"C:\Windows\Temp"
            } else {
                "/tmp"
            };
            tracing::warn!(
                temp_dir = %raw.display(),
                %fallback,
                "system temp dir is not UTF-8, using fallback"
            );
            Utf8PathBuf::from(fallback)
        });
        Self {
            repo_url: "https://github.com/tailwindlabs/tailwindcss.git".to_string(),
            git_command: "git".to_string(),
            toolchain_command: "cargo".to_string(),
            temp_root,
        }
    }
}

/// Sequences the pipeline stages, short-circuiting on the first failure.
pub struct SourcePipeline {
    probe: ToolchainProbe,
    fetcher: SourceFetcher,
    compiler: Compiler,
    locator: ArtifactLocator,
}

impl SourcePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            probe: ToolchainProbe::new(config.toolchain_command.clone()),
            fetcher: SourceFetcher::new(config.git_command, config.repo_url, config.temp_root),
            compiler: Compiler::new(config.toolchain_command),
            locator: ArtifactLocator::new(ExeNaming::host()),
        }
    }

    /// Build the product binary for `version`.
    ///
    /// Strictly sequential: probe toolchain, fetch source, compile, locate
    /// artifact. No stage runs after a failure, and the failure carries its
    /// [`Stage`]. The working directory is left in place in every outcome —
    /// on success for the caller to consume, on failure for inspection.
    ///
    /// `target` names the artifact and steers the search heuristics; it does
    /// not select a cross-compilation target (the build is host-only).
    pub fn build(&self, target: &str, version: &str) -> Result<BuildOutput, BuildError> {
        tracing::info!(%target, %version, "building from source");

        self.probe.check()?;
        let workdir = self.fetcher.fetch(version)?;
        self.compiler.compile(&workdir, target)?;

        let Some(artifact) = self.locator.locate(&workdir, target) else {
            return Err(BuildError::ArtifactNotFound {
                dir: workdir.join("target").join("release"),
            });
        };

        tracing::info!(artifact = %artifact, "source build complete");
        Ok(BuildOutput { artifact, workdir })
    }
}

impl Default for SourcePipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

/// Best-effort recursive removal of a working directory.
///
/// Idempotent: a missing directory is a no-op. Other failures are logged and
/// swallowed.
pub fn cleanup(workdir: &Utf8Path) {
    match std::fs::remove_dir_all(workdir) {
        Ok(()) => tracing::debug!(workdir = %workdir, "removed working directory"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(workdir = %workdir, error = %e, "failed to remove working directory");
        }
    }
}
