//! Command execution utilities
//!
//! Provides consistent command execution with proper error handling and logging.

use anyhow::{anyhow, Context, Result};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Result of a command execution.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    fn from_output(output: std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }

    /// Exit code for messages; "signal" when the process was killed.
    pub fn code_display(&self) -> String {
        self.code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string())
    }
}

/// Run a command and return its output.
///
/// Use `run_checked` if you want to treat non-zero exit as an error.
#[instrument(skip_all, fields(cmd = %cmd))]
pub async fn run(cmd: &str, args: &[&str]) -> Result<CommandOutput> {
    debug!(args = ?args, "Running command");

    let output = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .context(format!("Failed to execute {}", cmd))?;

    Ok(CommandOutput::from_output(output))
}

/// Run a command and return stdout if successful, error otherwise.
pub async fn run_checked(cmd: &str, args: &[&str]) -> Result<String> {
    let output = run(cmd, args).await?;
    if output.success {
        Ok(output.stdout)
    } else {
        Err(anyhow!(
            "{} failed (exit {}): {}",
            cmd,
            output.code_display(),
            output.stderr
        ))
    }
}

/// Run a command with `input` written to its stdin.
///
/// Arguments are logged but the input is not, since it may carry secrets.
#[instrument(skip_all, fields(cmd = %cmd))]
pub async fn run_with_input(cmd: &str, args: &[&str], input: &str) -> Result<CommandOutput> {
    debug!(args = ?args, "Running command with piped input");

    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context(format!("Failed to spawn {}", cmd))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(input.as_bytes())
            .await
            .context(format!("Failed to write to {} stdin", cmd))?;
        // Dropping stdin closes the pipe so the shell sees EOF.
    }

    let output = child
        .wait_with_output()
        .await
        .context(format!("Failed to wait for {}", cmd))?;

    Ok(CommandOutput::from_output(output))
}

/// Feed a script to the MongoDB shell connected to `uri`.
///
/// The raw output is returned even on non-zero exit so callers can
/// classify the failure.
///
/// # Example
/// ```ignore
/// let out = mongosh("mongosh", "mongodb://localhost:27017", "db.adminCommand({ping: 1})").await?;
/// ```
pub async fn mongosh(bin: &str, uri: &str, script: &str) -> Result<CommandOutput> {
    run_with_input(bin, &[uri, "--quiet", "--norc"], script).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_checked_returns_trimmed_stdout() {
        let out = run_checked("echo", &["  hello  "]).await.unwrap();
        assert_eq!(out, "hello");
    }

    #[tokio::test]
    async fn test_run_checked_reports_exit_code() {
        let err = run_checked("false", &[]).await.unwrap_err();
        assert!(err.to_string().contains("false failed (exit 1)"));
    }

    #[tokio::test]
    async fn test_run_with_input_pipes_stdin() {
        let out = run_with_input("cat", &[], "piped text\n").await.unwrap();
        assert!(out.success);
        assert_eq!(out.stdout, "piped text");
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let err = run_with_input("definitely-not-a-real-binary-xyz", &[], "")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to spawn"));
    }
}
