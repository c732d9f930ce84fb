use crate::finder;
use anyhow::Result;
use async_trait::async_trait;
use procwatch_core::{ProcessId, ProcessProbe, WatchError};
use tokio::process::Command;
use tracing::debug;

/// Windows-family probe: `tasklist` CSV listing, `taskkill` tree termination.
#[derive(Debug, Default)]
pub struct WindowsProbe;

impl WindowsProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessProbe for WindowsProbe {
    fn platform_name(&self) -> &'static str {
        "windows"
    }

    async fn snapshot(&self) -> Result<String> {
        // CSV listing without the header row.
        let output = Command::new("tasklist")
            .args(["/FO", "CSV", "/NH"])
            .output()
            .await?;

        if !output.status.success() {
            return Err(WatchError::CommandFailed(format!(
                "tasklist exited with {}",
                output.status
            ))
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn find(&self, output: &str, target: &str) -> Option<ProcessId> {
        finder::find_in_listing(output, target)
    }

    async fn terminate(&self, pid: ProcessId) {
        // Forceful kill of the process and its tree. Fire-and-forget: the
        // next poll cycle reflects the true state.
        match Command::new("taskkill")
            .args(["/PID", &pid.to_string(), "/T", "/F"])
            .output()
            .await
        {
            Ok(output) if output.status.success() => {
                debug!(pid, "taskkill completed");
            }
            Ok(output) => {
                debug!(pid, status = %output.status, "taskkill reported failure");
            }
            Err(error) => {
                debug!(pid, %error, "failed to run taskkill");
            }
        }
    }
}
