use crate::status::ProcessId;
use anyhow::Result;
use async_trait::async_trait;

/// Platform capability interface for process discovery and termination.
///
/// One implementation exists per supported platform family (POSIX-style `ps`
/// output with signal-based termination, Windows-style `tasklist` CSV output
/// with `taskkill`). The supervisor holds exactly one probe, selected once at
/// startup, so no platform branching leaks into the polling logic.
///
/// # Implementation Notes
///
/// Implementations should:
/// - Run the platform listing command in `snapshot` and treat any non-zero
///   exit or execution error uniformly as a failed poll
/// - Keep `find` a pure, total function over arbitrary text: garbage input
///   yields no match, never an error
/// - Make `terminate` best-effort and swallow failures from processes that
///   have already exited
#[async_trait]
pub trait ProcessProbe: Send + Sync {
    /// Platform family name for logging and debugging
    fn platform_name(&self) -> &'static str;

    /// Capture one snapshot of the OS process table as raw command output.
    ///
    /// # Returns
    ///
    /// Returns the listing command's stdout, or an error if the command could
    /// not run or exited non-zero. Callers treat the error as "not found".
    async fn snapshot(&self) -> Result<String>;

    /// Parse a listing snapshot and return the pid of the first row matching
    /// `target`, or `None` when no row matches.
    fn find(&self, output: &str, target: &str) -> Option<ProcessId>;

    /// Best-effort termination of `pid`. Fire-and-forget: errors are logged
    /// and swallowed, the next poll cycle reflects the true state.
    async fn terminate(&self, pid: ProcessId);
}

/// Factory trait for creating platform-specific probes.
///
/// Platform selection happens at compile time; the main `procwatch` crate
/// provides the factory that picks the probe for the build target.
pub trait ProbeFactory {
    /// The type of probe this factory creates
    type Probe: ProcessProbe;

    /// Create a probe for the current platform
    fn create_probe() -> Self::Probe;

    /// Get the platform name for logging and debugging
    fn platform_name() -> &'static str;
}
