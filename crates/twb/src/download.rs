//! Prebuilt release-asset download.

use camino::Utf8PathBuf;
use eyre::{bail, Result, WrapErr};

use crate::config::Config;
use crate::install;

/// Targets with published standalone binaries on the Tailwind release page.
const PREBUILT_TARGETS: [&str; 6] = [
    "linux-x64",
    "linux-arm64",
    "linux-armv7",
    "macos-x64",
    "macos-arm64",
    "windows-x64",
];

pub fn has_prebuilt(target: &str) -> bool {
    PREBUILT_TARGETS.contains(&target)
}

/// Release-asset URL for one version and target.
pub fn asset_url(version: &str, target: &str) -> String {
    format!(
        "https://github.com/tailwindlabs/tailwindcss/releases/download/v{version}/tailwindcss-{target}{}",
        windows_suffix(target)
    )
}

pub fn windows_suffix(target: &str) -> &'static str {
    if target.starts_with("windows") {
        ".exe"
    } else {
        ""
    }
}

/// Download the prebuilt binary and install it into the configured directory.
pub fn install_prebuilt(config: &Config) -> Result<Utf8PathBuf> {
    let url = asset_url(&config.version, &config.target);
    tracing::info!(%url, "downloading prebuilt binary");

    let response = reqwest::blocking::get(&url).wrap_err("release download failed")?;
    if !response.status().is_success() {
        bail!("release download failed: {} returned {}", url, response.status());
    }
    let bytes = response.bytes().wrap_err("reading release download")?;

    let dest = install::binary_path(&config.install_dir, &config.target);
    install::write_binary(&dest, &bytes)?;

    tracing::info!(dest = %dest, size = bytes.len(), "installed prebuilt binary");
    Ok(dest)
}
