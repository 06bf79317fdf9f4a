//! Source acquisition.
//!
//! Clones a pinned release tag of the upstream Tailwind repository into a
//! disposable working directory under the system temp root.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::exec;

/// Errors from fetching the source snapshot.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to reset working directory {path}: {source}")]
    WorkdirReset {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("git clone of {reference} failed: {message}")]
    CloneFailed { reference: String, message: String },
}

/// Fetches a pinned-version source snapshot.
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    git_command: String,
    repo_url: String,
    temp_root: Utf8PathBuf,
}

impl SourceFetcher {
    pub fn new(
        git_command: impl Into<String>,
        repo_url: impl Into<String>,
        temp_root: Utf8PathBuf,
    ) -> Self {
        Self {
            git_command: git_command.into(),
            repo_url: repo_url.into(),
            temp_root,
        }
    }

    /// Working directory for one version.
    ///
    /// Keyed by version plus a process-scoped suffix, so concurrent processes
    /// building the same version never share a tree. Within one process the
    /// path is deterministic.
    pub fn workdir_path(&self, version: &str) -> Utf8PathBuf {
        self.temp_root
            .join(format!("tailwindcss-build-{}-{}", version, std::process::id()))
    }

    /// Clone tag `v<version>` into a fresh working directory.
    ///
    /// Any directory left at the path by an earlier run is removed first;
    /// prior partial state is never trusted or resumed. The clone is shallow
    /// and single-branch. Contents are not validated beyond git's own exit
    /// code.
    pub fn fetch(&self, version: &str) -> Result<Utf8PathBuf, FetchError> {
        let workdir = self.workdir_path(version);
        let reference = format!("v{version}");

        match std::fs::remove_dir_all(&workdir) {
            Ok(()) => tracing::debug!(workdir = %workdir, "removed stale working directory"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(FetchError::WorkdirReset {
                    path: workdir,
                    source: e,
                })
            }
        }

        tracing::info!(%reference, workdir = %workdir, "cloning upstream source");

        let output = exec::run(
            &self.git_command,
            &[
                "clone",
                "--depth",
                "1",
                "--branch",
                reference.as_str(),
                "--single-branch",
                self.repo_url.as_str(),
                workdir.as_str(),
            ],
            None,
        )
        .map_err(|e| FetchError::CloneFailed {
            reference: reference.clone(),
            message: e.to_string(),
        })?;

        if !output.success() {
            return Err(FetchError::CloneFailed {
                reference,
                message: output.combined(),
            });
        }

        Ok(workdir)
    }
}
