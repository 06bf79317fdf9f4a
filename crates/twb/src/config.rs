//! Configuration for the install flow.
//!
//! An optional `twb.toml` supplies defaults; CLI flags override it; anything
//! still unset falls back to built-in defaults and host detection.

use camino::{Utf8Path, Utf8PathBuf};
use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;

/// Release installed when neither a flag nor the config file names one.
const DEFAULT_VERSION: &str = "4.1.12";

/// The `twb.toml` schema. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub version: Option<String>,
    pub target: Option<String>,
    pub build_from_source: Option<bool>,
    pub install_dir: Option<Utf8PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).wrap_err_with(|| format!("reading {path}"))?;
        toml::from_str(&text).wrap_err_with(|| format!("parsing {path}"))
    }
}

/// Fully resolved configuration.
#[derive(Debug)]
pub struct Config {
    /// Tailwind release version, without the leading `v`.
    pub version: String,
    /// Release-platform name used for install naming and artifact search.
    pub target: String,
    /// Skip the prebuilt asset and build from upstream source.
    pub build_from_source: bool,
    /// Directory the binary is installed into.
    pub install_dir: Utf8PathBuf,
}

impl Config {
    /// Merge CLI flags over the config file over defaults.
    pub fn resolve(
        file: Option<&Utf8Path>,
        version: Option<String>,
        target: Option<String>,
        from_source: bool,
        install_dir: Option<Utf8PathBuf>,
    ) -> Result<Self> {
        let file_config = match file {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let install_dir = match install_dir.or(file_config.install_dir) {
            Some(dir) => dir,
            None => default_install_dir()?,
        };

        Ok(Self {
            version: version
                .or(file_config.version)
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            target: target.or(file_config.target).unwrap_or_else(host_target),
            build_from_source: from_source || file_config.build_from_source.unwrap_or(false),
            install_dir,
        })
    }
}

/// Tailwind release-platform name for the host.
///
/// Platforms without a published asset (e.g. `freebsd-arm64`) still get a
/// name here; they are routed to the source-build fallback by the caller.
pub fn host_target() -> String {
    target_name(std::env::consts::OS, std::env::consts::ARCH)
}

pub fn target_name(os: &str, arch: &str) -> String {
    let arch = match arch {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        other => other,
    };
    format!("{os}-{arch}")
}

fn default_install_dir() -> Result<Utf8PathBuf> {
    // TWB_HOME overrides, mainly for tests and CI.
    if let Ok(home) = std::env::var("TWB_HOME") {
        return Ok(Utf8PathBuf::from(home).join("bin"));
    }

    let home = std::env::var("HOME").map_err(|_| eyre!("HOME not set"))?;
    Ok(Utf8PathBuf::from(home).join(".twb").join("bin"))
}
