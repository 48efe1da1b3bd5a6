use std::time::Duration;

use tracing::{debug, trace, warn};

use super::{Invocation, ToolError};

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: Option<i32>,
    pub success: bool,
    pub stdout: Vec<u8>,
    pub stderr: String,
}
impl ProcessOutput {
    pub fn into_success(self) -> Result<Self, ToolError> {
        if self.success {
            Ok(self)
        } else {
            Err(ToolError::Failed {
                code: self.status,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }

    #[must_use]
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }
}

/// Run the invocation to completion and collect both output streams.
///
/// The child is killed if it is still running when `timeout` elapses.
#[tracing::instrument(skip_all, fields(program = %invocation.program().display()))]
pub async fn run_to_end(
    invocation: &Invocation,
    timeout: Duration,
) -> Result<ProcessOutput, ToolError> {
    trace!(?invocation, "Running process");

    let child = invocation
        .command()
        .spawn()
        .map_err(|e| ToolError::spawn(invocation.program_name(), e))?;

    debug!(pid = ?child.id(), "Process spawned");

    // Dropping the future drops the child, and `kill_on_drop` takes it down.
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(output) => output?,
        Err(_) => {
            warn!(?timeout, "Process timed out, killing it");
            return Err(ToolError::Timeout(timeout));
        }
    };

    let output = ProcessOutput {
        status: output.status.code(),
        success: output.status.success(),
        stdout: output.stdout,
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    };

    debug!(status = ?output.status, "Process finished");

    Ok(output)
}
