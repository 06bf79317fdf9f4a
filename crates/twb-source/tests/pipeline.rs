//! Pipeline integration tests using stub `git` and `cargo` executables.
//!
//! Stubs keep the tests hermetic: no network, no real toolchain. Each test
//! gets its own directory of stub scripts and its own temp root for working
//! directories.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use twb_source::{cleanup, BuildError, PipelineConfig, SourceFetcher, SourcePipeline, Stage};

/// Stub `cargo` body: answers the version query and writes the product binary
/// on `build --release`. The compile step runs with the working directory set
/// to the source tree, so relative paths land inside it.
const CARGO_OK: &str = r#"if [ "$1" = "--version" ]; then
    echo "cargo 1.80.0 (stub)"
    exit 0
fi
mkdir -p target/release
printf 'binary' > target/release/tailwindcss"#;

/// Stub `git` body: creates the clone destination (the last argument) and
/// drops a marker file into it.
const GIT_OK: &str = r#"for arg in "$@"; do dest="$arg"; done
mkdir -p "$dest"
echo pinned > "$dest/SOURCE""#;

struct StubEnv {
    bin: TempDir,
    _tmp: TempDir,
    config: PipelineConfig,
}

impl StubEnv {
    fn new(git_body: &str, cargo_body: &str) -> Self {
        let bin = TempDir::new().expect("failed to create stub bin dir");
        let tmp = TempDir::new().expect("failed to create temp root");

        let bin_path = utf8(bin.path());
        let git = write_script(&bin_path, "git", git_body);
        let cargo = write_script(&bin_path, "cargo", cargo_body);

        let config = PipelineConfig {
            repo_url: "https://example.invalid/tailwindcss.git".to_string(),
            git_command: git.into_string(),
            toolchain_command: cargo.into_string(),
            temp_root: utf8(tmp.path()),
        };

        Self {
            bin,
            _tmp: tmp,
            config,
        }
    }

    fn pipeline(&self) -> SourcePipeline {
        SourcePipeline::new(self.config.clone())
    }

    fn temp_root_entries(&self) -> usize {
        std::fs::read_dir(self.config.temp_root.as_std_path())
            .expect("failed to read temp root")
            .count()
    }

    fn bin_file_exists(&self, name: &str) -> bool {
        self.bin.path().join(name).exists()
    }
}

fn utf8(path: &std::path::Path) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).expect("non-utf8 path")
}

fn write_script(dir: &Utf8Path, name: &str, body: &str) -> Utf8PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("failed to write script");
    let mut perms = std::fs::metadata(&path).expect("no metadata").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("failed to chmod script");
    path
}

#[test]
fn end_to_end_build_and_cleanup() {
    let env = StubEnv::new(GIT_OK, CARGO_OK);
    let pipeline = env.pipeline();

    let output = pipeline
        .build("freebsd-arm64", "4.1.12")
        .expect("build failed");

    assert!(output.artifact.as_str().ends_with("release/tailwindcss"));
    assert!(output.artifact.exists());
    assert!(output.workdir.exists());
    assert!(output.workdir.join("SOURCE").exists());

    cleanup(&output.workdir);
    assert!(!output.workdir.exists());

    cleanup(&output.workdir);
}

#[test]
fn missing_toolchain_gates_the_pipeline() {
    let mut env = StubEnv::new(GIT_OK, CARGO_OK);
    env.config.toolchain_command = "twb-no-such-toolchain".to_string();
    let pipeline = env.pipeline();

    let err = pipeline
        .build("linux-x64", "4.1.12")
        .expect_err("build should fail");

    assert_eq!(err.stage(), Stage::ProbingToolchain);
    assert!(matches!(err, BuildError::Toolchain(_)));
    // No working directory was created.
    assert_eq!(env.temp_root_entries(), 0);
}

#[test]
fn broken_toolchain_is_reported() {
    let env = StubEnv::new(GIT_OK, "echo 'no such subcommand' >&2\nexit 101");
    let pipeline = env.pipeline();

    let err = pipeline
        .build("linux-x64", "4.1.12")
        .expect_err("build should fail");

    assert_eq!(err.stage(), Stage::ProbingToolchain);
    assert!(err.to_string().contains("no such subcommand"));
    assert_eq!(env.temp_root_entries(), 0);
}

#[test]
fn clone_failure_short_circuits() {
    // cargo records whether its build subcommand ever ran.
    let cargo_body = r#"if [ "$1" = "--version" ]; then
    echo "cargo 1.80.0 (stub)"
    exit 0
fi
touch "$(dirname "$0")/compile-invoked""#;
    let git_body = "echo \"fatal: Remote branch v4.1.12 not found\" >&2\nexit 128";

    let env = StubEnv::new(git_body, cargo_body);
    let pipeline = env.pipeline();

    let err = pipeline
        .build("linux-x64", "4.1.12")
        .expect_err("build should fail");

    assert_eq!(err.stage(), Stage::Fetching);
    assert!(err.to_string().contains("Remote branch v4.1.12 not found"));
    assert!(!env.bin_file_exists("compile-invoked"));
}

#[test]
fn compile_failure_carries_tool_output() {
    let cargo_body = r#"if [ "$1" = "--version" ]; then
    echo "cargo 1.80.0 (stub)"
    exit 0
fi
echo "error[E0425]: cannot find value" >&2
exit 101"#;

    let env = StubEnv::new(GIT_OK, cargo_body);
    let pipeline = env.pipeline();

    let err = pipeline
        .build("linux-x64", "4.1.12")
        .expect_err("build should fail");

    assert_eq!(err.stage(), Stage::Compiling);
    assert!(err.to_string().contains("E0425"));
}

#[test]
fn successful_build_without_artifact_is_artifact_not_found() {
    // Build "succeeds" but produces an empty release directory.
    let cargo_body = r#"if [ "$1" = "--version" ]; then
    echo "cargo 1.80.0 (stub)"
    exit 0
fi
mkdir -p target/release"#;

    let env = StubEnv::new(GIT_OK, cargo_body);
    let pipeline = env.pipeline();

    let err = pipeline
        .build("linux-x64", "4.1.12")
        .expect_err("build should fail");

    assert_eq!(err.stage(), Stage::Locating);
    assert!(matches!(err, BuildError::ArtifactNotFound { .. }));
}

#[test]
fn fetch_is_destructively_idempotent() {
    let env = StubEnv::new(GIT_OK, CARGO_OK);
    let fetcher = SourceFetcher::new(
        env.config.git_command.clone(),
        env.config.repo_url.clone(),
        env.config.temp_root.clone(),
    );

    let first = fetcher.fetch("4.1.12").expect("first fetch failed");
    assert!(first.join("SOURCE").exists());

    // Leftover state from the first run must not survive the second.
    std::fs::write(first.join("leftover"), b"stale").unwrap();

    let second = fetcher.fetch("4.1.12").expect("second fetch failed");
    assert_eq!(first, second);
    assert!(second.join("SOURCE").exists());
    assert!(!second.join("leftover").exists());
    assert_eq!(env.temp_root_entries(), 1);
}
