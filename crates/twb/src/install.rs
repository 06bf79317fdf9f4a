//! Placing the provisioned binary at its install location.

use camino::{Utf8Path, Utf8PathBuf};
use eyre::{Result, WrapErr};

use crate::download::windows_suffix;

/// Install path for the binary, named after the target platform.
pub fn binary_path(install_dir: &Utf8Path, target: &str) -> Utf8PathBuf {
    install_dir.join(format!("tailwindcss-{target}{}", windows_suffix(target)))
}

/// Write binary bytes to `dest` and mark it executable.
pub fn write_binary(dest: &Utf8Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).wrap_err_with(|| format!("creating {parent}"))?;
    }
    std::fs::write(dest, bytes).wrap_err_with(|| format!("writing {dest}"))?;
    set_executable(dest)
}

/// Copy a source-built artifact into the install directory.
pub fn install_artifact(
    artifact: &Utf8Path,
    install_dir: &Utf8Path,
    target: &str,
) -> Result<Utf8PathBuf> {
    let dest = binary_path(install_dir, target);
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).wrap_err_with(|| format!("creating {parent}"))?;
    }
    std::fs::copy(artifact, &dest).wrap_err_with(|| format!("copying {artifact} to {dest}"))?;
    set_executable(&dest)?;

    tracing::info!(from = %artifact, to = %dest, "installed built binary");
    Ok(dest)
}

#[cfg(unix)]
fn set_executable(path: &Utf8Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)
        .wrap_err_with(|| format!("reading metadata of {path}"))?
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).wrap_err_with(|| format!("chmod {path}"))
}

#[cfg(not(unix))]
fn set_executable(_path: &Utf8Path) -> Result<()> {
    Ok(())
}
