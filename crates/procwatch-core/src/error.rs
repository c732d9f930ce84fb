use thiserror::Error;

/// Core error types for watcher operations
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("process listing command failed: {0}")]
    CommandFailed(String),

    #[error("invalid watcher configuration: {0}")]
    InvalidConfig(String),

    #[error("status channel closed")]
    SinkClosed,
}

impl WatchError {
    /// Check if this error is recovered locally by the supervisor.
    ///
    /// Recoverable errors downgrade the published status or drop a single
    /// update; they never surface to callers of the lifecycle operations.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, WatchError::CommandFailed(_) | WatchError::SinkClosed)
    }
}
