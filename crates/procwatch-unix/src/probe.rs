use crate::finder;
use anyhow::Result;
use async_trait::async_trait;
use procwatch_core::{ProcessId, ProcessProbe, WatchError};
use tokio::process::Command;
use tracing::debug;

/// POSIX-family probe: `ps` listing, signal-based termination.
#[derive(Debug, Default)]
pub struct UnixProbe;

impl UnixProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessProbe for UnixProbe {
    fn platform_name(&self) -> &'static str {
        "unix"
    }

    async fn snapshot(&self) -> Result<String> {
        // Headerless full-process listing: pid plus command path.
        let output = Command::new("ps").args(["-axo", "pid=,comm="]).output().await?;

        if !output.status.success() {
            return Err(WatchError::CommandFailed(format!(
                "ps exited with {}",
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
        terminate_impl(pid);
    }
}

#[cfg(unix)]
fn terminate_impl(pid: ProcessId) {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    // Best-effort graceful termination; a process that already exited
    // (ESRCH) is the routine case and not reported.
    match signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
        Ok(()) => debug!(pid, "sent SIGTERM to watched process"),
        Err(errno) => debug!(pid, %errno, "SIGTERM not delivered"),
    }
}

#[cfg(not(unix))]
fn terminate_impl(pid: ProcessId) {
    debug!(pid, "signal termination unavailable on this platform");
}
