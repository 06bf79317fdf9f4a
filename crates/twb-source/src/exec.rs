//! External process invocation with structured results.

use std::process::Command;

use camino::Utf8Path;

/// Captured result of running an external command to completion.
#[derive(Debug)]
pub struct RunOutput {
    /// Process exit code (-1 if the process was terminated by a signal).
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout and stderr joined, for error reporting.
    pub fn combined(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        if stdout.is_empty() {
            stderr.to_string()
        } else if stderr.is_empty() {
            stdout.to_string()
        } else {
            format!("{stdout}\n{stderr}")
        }
    }
}

/// Run `program` with `args`, blocking until it exits.
///
/// `cwd` scopes the child's working directory; the calling process's own
/// working directory is never changed. Spawn failures surface as `io::Error`;
/// a non-zero exit is not an error at this layer.
pub fn run(program: &str, args: &[&str], cwd: Option<&Utf8Path>) -> std::io::Result<RunOutput> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    tracing::debug!(%program, ?args, cwd = ?cwd, "running command");

    let output = cmd.output()?;

    Ok(RunOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}
