use crate::factory::PlatformProbeFactory;
use procwatch_core::{
    ProbeFactory, ProcessProbe, StatusEvent, Supervisor, WatchError, WatchSender, WatchStatus,
    WatcherConfig,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// High-level liveness watcher for one external process name.
///
/// Wraps the core supervisor with the probe for the build platform and a
/// `tokio::sync::watch` status channel for host layers to subscribe to.
/// The watcher owns the sending half; dropping every subscriber simply makes
/// subsequent updates silent, it never errors the polling side.
pub struct ProcessWatcher {
    supervisor: Supervisor,
    rx: watch::Receiver<StatusEvent>,
}

impl ProcessWatcher {
    /// Create a watcher using the probe for the current platform.
    ///
    /// Fails only on invalid configuration; every runtime failure after this
    /// point degrades to a "not running" status instead of erroring.
    pub fn new(config: WatcherConfig) -> Result<Self, WatchError> {
        let probe = Arc::new(PlatformProbeFactory::create_probe());
        info!(
            platform = PlatformProbeFactory::platform_name(),
            "creating process watcher"
        );
        Self::with_probe(config, probe)
    }

    /// Create a watcher with an explicit probe implementation.
    pub fn with_probe(
        config: WatcherConfig,
        probe: Arc<dyn ProcessProbe>,
    ) -> Result<Self, WatchError> {
        config.validate()?;
        let (sink, rx) = WatchSender::channel(config.event_key.clone());
        let supervisor = Supervisor::new(config, probe, Arc::new(sink));
        Ok(Self { supervisor, rx })
    }

    /// Swap the watched process name; no-op when unchanged. With `restart`
    /// the schedule is torn down and re-initialized against the new name.
    pub fn set_target(&self, name: impl Into<String>, restart: bool) {
        self.supervisor.set_target(name, restart);
    }

    /// Start (or restart) recurring polling. At most one schedule is ever
    /// active, no matter how often this is called.
    pub fn init(&self) {
        self.supervisor.init();
    }

    /// Run a single poll cycle immediately.
    pub async fn poll_once(&self) {
        self.supervisor.poll_once().await;
    }

    /// Best-effort termination of the watched process; no-op without a
    /// known pid.
    pub async fn terminate(&self) {
        self.supervisor.terminate().await;
    }

    /// Stop polling and clear the target and last-known status. Idempotent.
    pub fn teardown(&self) {
        self.supervisor.teardown();
    }

    /// Status as of the most recently completed poll
    pub fn status(&self) -> WatchStatus {
        self.supervisor.status()
    }

    /// Currently watched process name, if any
    pub fn target(&self) -> Option<String> {
        self.supervisor.target()
    }

    /// Whether a recurring poll schedule is active
    pub fn is_polling(&self) -> bool {
        self.supervisor.is_polling()
    }

    /// Subscribe to published status updates.
    pub fn subscribe(&self) -> watch::Receiver<StatusEvent> {
        self.rx.clone()
    }
}
