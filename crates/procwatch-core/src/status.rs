use serde::{Deserialize, Serialize};

/// Unique identifier for a process
pub type ProcessId = u32;

/// Liveness of the watch target as of the last completed poll cycle.
///
/// `is_running` is true exactly when `pid` holds a value; both fields are
/// always updated together and reflect the most recently completed poll, not
/// real-time truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchStatus {
    pub is_running: bool,
    pub pid: Option<ProcessId>,
}

impl WatchStatus {
    pub fn running(pid: ProcessId) -> Self {
        Self {
            is_running: true,
            pid: Some(pid),
        }
    }

    pub fn not_running() -> Self {
        Self::default()
    }
}

/// Outcome of a single poll cycle. Transient; never kept beyond updating the
/// supervisor state and publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    pub found: bool,
    pub pid: Option<ProcessId>,
}

impl PollOutcome {
    pub fn found(pid: ProcessId) -> Self {
        Self {
            found: true,
            pid: Some(pid),
        }
    }

    pub fn not_found() -> Self {
        Self {
            found: false,
            pid: None,
        }
    }

    pub fn status(&self) -> WatchStatus {
        WatchStatus {
            is_running: self.found,
            pid: self.pid,
        }
    }
}

/// Status update as delivered on the outbound notification channel,
/// identified by the sink's stable event key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub key: String,
    pub status: WatchStatus,
}
