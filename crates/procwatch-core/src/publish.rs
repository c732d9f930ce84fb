use crate::error::WatchError;
use crate::status::{StatusEvent, WatchStatus};
use tokio::sync::watch;
use tracing::debug;

/// Outbound sink for status updates.
///
/// The supervisor only ever writes to the sink and never assumes exclusive
/// ownership of the underlying delivery channel. A torn-down channel is a
/// routine race with an in-flight poll, not a reportable error; `publish`
/// must never fail.
pub trait StatusSink: Send + Sync {
    fn publish(&self, status: WatchStatus);
}

/// Sink adapter over a `tokio::sync::watch` channel.
///
/// Each update is tagged with the sink's stable event key. When every
/// receiver has been dropped the channel counts as destroyed and updates are
/// silently discarded.
pub struct WatchSender {
    key: String,
    tx: watch::Sender<StatusEvent>,
}

impl WatchSender {
    /// Create a sink and the receiving half host layers subscribe through.
    pub fn channel(key: impl Into<String>) -> (Self, watch::Receiver<StatusEvent>) {
        let key = key.into();
        let (tx, rx) = watch::channel(StatusEvent {
            key: key.clone(),
            status: WatchStatus::not_running(),
        });
        (Self { key, tx }, rx)
    }

    /// Event key carried on every update from this sink
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Deliver a status update, failing if the channel has been torn down.
    pub fn try_publish(&self, status: WatchStatus) -> Result<(), WatchError> {
        let event = StatusEvent {
            key: self.key.clone(),
            status,
        };
        self.tx.send(event).map_err(|_| WatchError::SinkClosed)
    }
}

impl StatusSink for WatchSender {
    fn publish(&self, status: WatchStatus) {
        if let Err(error) = self.try_publish(status) {
            // Teardown racing an in-flight poll; drop the update.
            debug!(%error, "status sink unavailable, dropping update");
        }
    }
}
