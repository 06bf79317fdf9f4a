//! twb - provisions the Tailwind standalone binary.
//!
//! Downloads the prebuilt release asset when one is published for the target
//! platform, and otherwise falls back to building it from upstream source via
//! `twb-source`.

mod config;
mod download;
mod install;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use eyre::{eyre, Result};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use twb_source::{cleanup, PipelineConfig, SourcePipeline};

/// twb - Tailwind standalone binary bootstrapper
#[derive(Parser, Debug)]
#[command(name = "twb", version)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Download or build the Tailwind binary and install it
    Install {
        /// Tailwind release version (e.g. 4.1.12)
        #[arg(long)]
        version: Option<String>,

        /// Target platform name (e.g. linux-x64, macos-arm64)
        #[arg(long)]
        target: Option<String>,

        /// Build from upstream source even if a prebuilt asset exists
        #[arg(long)]
        from_source: bool,

        /// Directory to install the binary into
        #[arg(long)]
        install_dir: Option<Utf8PathBuf>,

        /// Path to a twb.toml config file
        #[arg(long)]
        config: Option<Utf8PathBuf>,
    },

    /// Print the twb version
    Version,
}

fn main() -> Result<()> {
    // Initialize tracing from RUST_LOG (e.g. RUST_LOG=twb_source=debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        CliCommand::Install {
            version,
            target,
            from_source,
            install_dir,
            config,
        } => {
            let config = Config::resolve(
                config.as_deref(),
                version,
                target,
                from_source,
                install_dir,
            )?;
            cmd_install(&config)
        }
        CliCommand::Version => {
            println!("twb {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn cmd_install(config: &Config) -> Result<()> {
    tracing::info!(
        version = %config.version,
        target = %config.target,
        "provisioning tailwindcss"
    );

    let installed = if config.build_from_source || !download::has_prebuilt(&config.target) {
        if !config.build_from_source {
            tracing::info!(
                target = %config.target,
                "no prebuilt binary for this target, building from source"
            );
        }
        install_from_source(config)?
    } else {
        download::install_prebuilt(config)?
    };

    println!("installed {installed}");
    Ok(())
}

/// Run the source-build pipeline and install its artifact.
///
/// The working directory is cleaned up only after the artifact has been
/// copied out; on pipeline failure it is left in place for inspection.
fn install_from_source(config: &Config) -> Result<Utf8PathBuf> {
    let pipeline = SourcePipeline::new(PipelineConfig::default());

    let output = pipeline
        .build(&config.target, &config.version)
        .map_err(|e| eyre!("source build failed while {}: {}", e.stage(), e))?;

    let installed = install::install_artifact(&output.artifact, &config.install_dir, &config.target)?;
    cleanup(&output.workdir);
    Ok(installed)
}
