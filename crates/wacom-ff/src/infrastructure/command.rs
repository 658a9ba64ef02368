//! Subprocess runner shared by the xdotool, xrandr and xsetwacom adapters.
//!
//! Every invocation is bounded by an optional timeout.  A child that outlives
//! it is killed (`kill_on_drop`) and the call fails with
//! [`ExternalCallError::TimedOut`], so a hung tool only costs one poll cycle.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::application::ExternalCallError;

/// Default upper bound for one external tool invocation.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// An external program plus the timeout applied to each of its invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTool {
    program: String,
    timeout: Option<Duration>,
}

impl ExternalTool {
    /// `timeout == None` waits indefinitely.
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Runs the program with `args` and returns its standard output.
    ///
    /// # Errors
    ///
    /// - [`ExternalCallError::Spawn`] if the program cannot be started.
    /// - [`ExternalCallError::TimedOut`] if it does not exit in time.
    /// - [`ExternalCallError::Failed`] on a non-zero exit status.
    /// - [`ExternalCallError::InvalidOutput`] if stdout is not UTF-8.
    pub async fn run(&self, args: &[&str]) -> Result<String, ExternalCallError> {
        debug!(program = %self.program, ?args, "running command");

        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| ExternalCallError::TimedOut {
                    program: self.program.clone(),
                    timeout: limit,
                })?,
            None => command.output().await,
        }
        .map_err(|source| ExternalCallError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(ExternalCallError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                output: message.trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| ExternalCallError::InvalidOutput {
            program: self.program.clone(),
            detail: e.to_string(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
