//! Platform-aware executable discovery in the build output tree.

use camino::{Utf8Path, Utf8PathBuf};

/// Product name matched as a substring during discovery.
pub const PRODUCT: &str = "tailwindcss";

/// Known binary names, in preference order: the primary CLI first, then the
/// native engine variant, each with and without the Windows suffix.
pub const KNOWN_BINARIES: [&str; 4] = [
    "tailwindcss",
    "tailwindcss.exe",
    "tailwindcss-oxide",
    "tailwindcss-oxide.exe",
];

/// Executable-naming rule for one OS family.
///
/// Selected once via host detection and injected into [`ArtifactLocator`],
/// so each family's rule is testable without mocking the real OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExeNaming {
    /// Executables carry the `.exe` suffix.
    Windows,
    /// Executables carry no extension; a short allowlist covers known binary
    /// names that do.
    Unix,
}

impl ExeNaming {
    /// Rule for the platform this process is running on.
    pub fn host() -> Self {
        if cfg!(windows) {
            ExeNaming::Windows
        } else {
            ExeNaming::Unix
        }
    }

    /// Whether `name` looks like an executable under this family's rule.
    pub fn is_executable(&self, name: &str) -> bool {
        match self {
            ExeNaming::Windows => name.ends_with(".exe"),
            ExeNaming::Unix => !name.contains('.') || KNOWN_BINARIES.contains(&name),
        }
    }
}

/// Searches the toolchain's release output directory for the product binary.
#[derive(Debug, Clone)]
pub struct ArtifactLocator {
    naming: ExeNaming,
}

impl ArtifactLocator {
    pub fn new(naming: ExeNaming) -> Self {
        Self { naming }
    }

    /// Find the product executable under `<workdir>/target/release`.
    ///
    /// Selection is deterministic and independent of directory listing order:
    /// exact known names win in [`KNOWN_BINARIES`] order, then
    /// product-substring matches in lexical order. Returns `None` if the
    /// output directory is unreadable or no entry matches; the coordinator
    /// decides whether absence is an error.
    pub fn locate(&self, workdir: &Utf8Path, target: &str) -> Option<Utf8PathBuf> {
        let release_dir = workdir.join("target").join("release");

        let entries = match release_dir.read_dir_utf8() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(dir = %release_dir, error = %e, "release output directory unreadable");
                return None;
            }
        };

        let mut candidates: Vec<String> = Vec::new();
        for entry in entries.flatten() {
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            let name = entry.file_name().to_string();
            if self.naming.is_executable(&name) {
                candidates.push(name);
            }
        }

        for known in KNOWN_BINARIES {
            if candidates.iter().any(|c| c == known) {
                let path = release_dir.join(known);
                tracing::debug!(%target, artifact = %path, "located known binary");
                return Some(path);
            }
        }

        candidates.sort();
        let name = candidates.into_iter().find(|c| c.contains(PRODUCT))?;
        let path = release_dir.join(&name);
        tracing::debug!(%target, artifact = %path, "located binary by product name");
        Some(path)
    }
}
