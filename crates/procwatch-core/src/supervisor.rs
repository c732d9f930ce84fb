use crate::config::WatcherConfig;
use crate::probe::ProcessProbe;
use crate::publish::StatusSink;
use crate::status::{PollOutcome, ProcessId, WatchStatus};
use std::sync::{Arc, Mutex};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Owns the current watch target, the recurring poll schedule, and the
/// last-known status of the watched process.
///
/// All state lives behind a single mutex, so the lifecycle operations may be
/// called from any task. Poll bodies run as spawned tasks; a completion only
/// applies if its generation still matches the supervisor's current
/// generation, so a restart or teardown invalidates every in-flight poll
/// (last-completed-wins within a generation).
///
/// Lifecycle operations that start the schedule (`init`, `set_target` with
/// restart) must be called within a Tokio runtime.
pub struct Supervisor {
    config: WatcherConfig,
    probe: Arc<dyn ProcessProbe>,
    sink: Arc<dyn StatusSink>,
    shared: Arc<Shared>,
}

struct Shared {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    target: Option<String>,
    pid: Option<ProcessId>,
    is_running: bool,
    schedule: Option<CancellationToken>,
    generation: u64,
}

impl Supervisor {
    /// Create a supervisor with the given probe and sink.
    ///
    /// A target supplied through the configuration is applied immediately;
    /// polling does not start until `init` is called.
    pub fn new(
        config: WatcherConfig,
        probe: Arc<dyn ProcessProbe>,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                target: config.target.clone().filter(|t| !t.trim().is_empty()),
                ..Default::default()
            }),
        });
        Self {
            config,
            probe,
            sink,
            shared,
        }
    }

    /// Swap the watched process name.
    ///
    /// Setting the current value again is a no-op: no schedule reset, no
    /// extra poll. With `restart`, the schedule and last-known status are
    /// reset and polling re-initializes against the new name.
    pub fn set_target(&self, name: impl Into<String>, restart: bool) {
        let name = name.into();
        if name.trim().is_empty() {
            debug!("ignoring empty watch target");
            return;
        }

        {
            let mut state = self.lock_state();
            if state.target.as_deref() == Some(name.as_str()) {
                debug!(target = %name, "watch target unchanged");
                return;
            }
            info!(target = %name, "watch target updated");
            state.target = Some(name);
        }

        if restart {
            self.reset_schedule();
            self.init();
        }
    }

    /// Start (or restart) the recurring poll schedule.
    ///
    /// No-op without a target. Any existing schedule is cancelled first, so
    /// repeated calls leave exactly one schedule active. One poll fires
    /// immediately, then one per configured interval.
    pub fn init(&self) {
        let (target, generation, token) = {
            let mut state = self.lock_state();
            let Some(target) = state.target.clone() else {
                debug!("init skipped: no watch target set");
                return;
            };
            if let Some(previous) = state.schedule.take() {
                previous.cancel();
            }
            state.generation += 1;
            let token = CancellationToken::new();
            state.schedule = Some(token.clone());
            (target, state.generation, token)
        };

        info!(
            target = %target,
            interval_ms = self.config.poll_interval_ms,
            platform = self.probe.platform_name(),
            "starting liveness polling"
        );

        let shared = self.shared.clone();
        let probe = self.probe.clone();
        let sink = self.sink.clone();
        let interval = self.config.poll_interval();

        // One immediate poll, then the recurring schedule.
        tokio::spawn(poll_cycle(
            shared.clone(),
            probe.clone(),
            sink.clone(),
            generation,
        ));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the immediate poll has
            // already been issued above.
            ticker.tick().await;
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    // Each poll body runs as its own task so a slow listing
                    // command never delays the next initiation.
                    _ = ticker.tick() => {
                        tokio::spawn(poll_cycle(
                            shared.clone(),
                            probe.clone(),
                            sink.clone(),
                            generation,
                        ));
                    }
                }
            }
            debug!("poll schedule stopped");
        });
    }

    /// Run a single poll cycle against the current target.
    pub async fn poll_once(&self) {
        let generation = self.lock_state().generation;
        poll_cycle(
            self.shared.clone(),
            self.probe.clone(),
            self.sink.clone(),
            generation,
        )
        .await;
    }

    /// Best-effort termination of the watched process.
    ///
    /// No-op without a known pid. Failures are swallowed by the probe; the
    /// next poll cycle reflects the true state.
    pub async fn terminate(&self) {
        let pid = self.lock_state().pid;
        let Some(pid) = pid else {
            debug!("terminate skipped: no known process id");
            return;
        };
        info!(pid, "terminating watched process");
        self.probe.terminate(pid).await;
    }

    /// Cancel the poll schedule and clear target, pid, and running flag.
    /// Idempotent; safe to call when nothing is active.
    pub fn teardown(&self) {
        let token = {
            let mut state = self.lock_state();
            state.generation += 1;
            state.target = None;
            state.pid = None;
            state.is_running = false;
            state.schedule.take()
        };
        if let Some(token) = token {
            token.cancel();
            info!("watch supervisor torn down");
        }
    }

    /// Status as of the most recently completed poll
    pub fn status(&self) -> WatchStatus {
        let state = self.lock_state();
        WatchStatus {
            is_running: state.is_running,
            pid: state.pid,
        }
    }

    /// Currently watched process name, if any
    pub fn target(&self) -> Option<String> {
        self.lock_state().target.clone()
    }

    /// Whether a recurring poll schedule is active
    pub fn is_polling(&self) -> bool {
        self.lock_state().schedule.is_some()
    }

    /// Cancel the schedule and reset last-known status, keeping the target.
    /// In-flight completions are invalidated by the generation bump.
    fn reset_schedule(&self) {
        let token = {
            let mut state = self.lock_state();
            state.generation += 1;
            state.pid = None;
            state.is_running = false;
            state.schedule.take()
        };
        if let Some(token) = token {
            token.cancel();
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, State> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        if let Ok(mut state) = self.shared.state.lock() {
            if let Some(token) = state.schedule.take() {
                token.cancel();
            }
        }
    }
}

/// One poll cycle: snapshot the process table, find the target, update state,
/// publish. A listing failure downgrades to "not running" and still
/// publishes; a stale generation discards the completion entirely.
async fn poll_cycle(
    shared: Arc<Shared>,
    probe: Arc<dyn ProcessProbe>,
    sink: Arc<dyn StatusSink>,
    generation: u64,
) {
    let target = {
        let state = shared
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if state.generation != generation {
            return;
        }
        match &state.target {
            Some(target) => target.clone(),
            None => {
                debug!("poll skipped: no watch target set");
                return;
            }
        }
    };

    let outcome = match probe.snapshot().await {
        Ok(output) => match probe.find(&output, &target) {
            Some(pid) => PollOutcome::found(pid),
            None => PollOutcome::not_found(),
        },
        Err(error) => {
            // Routine: a failed listing command means "not running".
            debug!(%error, "process listing failed");
            PollOutcome::not_found()
        }
    };

    let status = {
        let mut state = shared
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if state.generation != generation {
            debug!("discarding stale poll completion");
            return;
        }
        state.pid = outcome.pid;
        state.is_running = outcome.found;
        outcome.status()
    };
    sink.publish(status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::WatchSender;
    use crate::status::StatusEvent;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{Notify, watch};
    use tokio::task::yield_now;
    use tokio::time::{Duration, advance};

    /// Probe returning a fixed listing (or a fixed failure), counting calls.
    struct ScriptedProbe {
        listing: Option<String>,
        snapshots: AtomicUsize,
        kills: Mutex<Vec<ProcessId>>,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedProbe {
        fn with_listing(listing: &str) -> Self {
            Self {
                listing: Some(listing.to_string()),
                snapshots: AtomicUsize::new(0),
                kills: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        fn failing() -> Self {
            Self {
                listing: None,
                snapshots: AtomicUsize::new(0),
                kills: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        fn gated(listing: &str, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::with_listing(listing)
            }
        }

        fn snapshot_count(&self) -> usize {
            self.snapshots.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProcessProbe for ScriptedProbe {
        fn platform_name(&self) -> &'static str {
            "scripted"
        }

        async fn snapshot(&self) -> Result<String> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.snapshots.fetch_add(1, Ordering::SeqCst);
            match &self.listing {
                Some(listing) => Ok(listing.clone()),
                None => anyhow::bail!("listing command failed"),
            }
        }

        fn find(&self, output: &str, target: &str) -> Option<ProcessId> {
            output.lines().find_map(|line| {
                let (pid, name) = line.trim().split_once(' ')?;
                name.eq_ignore_ascii_case(target)
                    .then(|| pid.parse().ok())
                    .flatten()
            })
        }

        async fn terminate(&self, pid: ProcessId) {
            self.kills.lock().unwrap().push(pid);
        }
    }

    fn harness(
        probe: Arc<ScriptedProbe>,
    ) -> (Supervisor, watch::Receiver<StatusEvent>) {
        let config = WatcherConfig::default();
        let (sink, rx) = WatchSender::channel(config.event_key.clone());
        (Supervisor::new(config, probe, Arc::new(sink)), rx)
    }

    /// Let spawned poll tasks run to completion on the paused clock.
    async fn settle() {
        for _ in 0..20 {
            yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_poll_then_recurring_every_interval() {
        let probe = Arc::new(ScriptedProbe::with_listing("42 myapp"));
        let (supervisor, rx) = harness(probe.clone());

        supervisor.set_target("myapp", false);
        supervisor.init();
        settle().await;
        assert_eq!(probe.snapshot_count(), 1);
        assert_eq!(rx.borrow().status, WatchStatus::running(42));

        advance(Duration::from_millis(1_999)).await;
        settle().await;
        assert_eq!(probe.snapshot_count(), 1);

        advance(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(probe.snapshot_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn set_target_same_value_is_a_no_op() {
        let probe = Arc::new(ScriptedProbe::with_listing("42 myapp"));
        let (supervisor, _rx) = harness(probe.clone());

        supervisor.set_target("myapp", true);
        settle().await;
        assert_eq!(probe.snapshot_count(), 1);

        // Same value again: no schedule reset, no extra poll.
        supervisor.set_target("myapp", true);
        settle().await;
        assert_eq!(probe.snapshot_count(), 1);

        // Still exactly one schedule.
        advance(Duration::from_millis(2_000)).await;
        settle().await;
        assert_eq!(probe.snapshot_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_init_keeps_one_schedule() {
        let probe = Arc::new(ScriptedProbe::with_listing("42 myapp"));
        let (supervisor, _rx) = harness(probe.clone());
        supervisor.set_target("myapp", false);

        supervisor.init();
        supervisor.init();
        supervisor.init();
        settle().await;
        // The superseded schedules' immediate polls are invalidated by the
        // generation bump before they ever run the listing command.
        assert_eq!(probe.snapshot_count(), 1);

        // Only the last schedule survives: one poll per interval, not three.
        advance(Duration::from_millis(2_000)).await;
        settle().await;
        assert_eq!(probe.snapshot_count(), 2);
        advance(Duration::from_millis(2_000)).await;
        settle().await;
        assert_eq!(probe.snapshot_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_stops_polling_and_clears_state() {
        let probe = Arc::new(ScriptedProbe::with_listing("42 myapp"));
        let (supervisor, _rx) = harness(probe.clone());
        supervisor.set_target("myapp", false);
        supervisor.init();
        settle().await;
        assert_eq!(supervisor.status(), WatchStatus::running(42));

        supervisor.teardown();
        assert_eq!(supervisor.status(), WatchStatus::not_running());
        assert_eq!(supervisor.target(), None);
        assert!(!supervisor.is_polling());

        advance(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(probe.snapshot_count(), 1);

        // Idempotent.
        supervisor.teardown();

        // init after teardown is a no-op until a target is set again.
        supervisor.init();
        settle().await;
        assert_eq!(probe.snapshot_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn listing_failure_downgrades_and_still_publishes() {
        let probe = Arc::new(ScriptedProbe::with_listing("42 myapp"));
        let (supervisor, rx) = harness(probe.clone());
        supervisor.set_target("myapp", false);
        supervisor.poll_once().await;
        assert_eq!(rx.borrow().status, WatchStatus::running(42));

        let failing = Arc::new(ScriptedProbe::failing());
        let (supervisor, rx) = harness(failing.clone());
        supervisor.set_target("myapp", false);
        supervisor.init();
        settle().await;
        assert_eq!(failing.snapshot_count(), 1);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow().status, WatchStatus::not_running());
    }

    #[tokio::test(start_paused = true)]
    async fn terminate_without_pid_is_a_no_op() {
        let probe = Arc::new(ScriptedProbe::with_listing("42 myapp"));
        let (supervisor, _rx) = harness(probe.clone());

        supervisor.terminate().await;
        assert!(probe.kills.lock().unwrap().is_empty());

        supervisor.set_target("myapp", false);
        supervisor.poll_once().await;
        supervisor.terminate().await;
        assert_eq!(*probe.kills.lock().unwrap(), vec![42]);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_completion_is_discarded_after_teardown() {
        let gate = Arc::new(Notify::new());
        let probe = Arc::new(ScriptedProbe::gated("42 myapp", gate.clone()));
        let (supervisor, rx) = harness(probe.clone());
        supervisor.set_target("myapp", false);
        supervisor.init();
        settle().await;
        // Immediate poll is parked on the gate.
        assert_eq!(probe.snapshot_count(), 0);

        supervisor.teardown();
        gate.notify_waiters();
        settle().await;

        // Completion ran but its generation was invalidated: no state
        // update, no publish.
        assert_eq!(probe.snapshot_count(), 1);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(supervisor.status(), WatchStatus::not_running());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_swaps_target_and_reschedules() {
        let probe = Arc::new(ScriptedProbe::with_listing("42 myapp\n7 other"));
        let (supervisor, rx) = harness(probe.clone());

        supervisor.set_target("myapp", true);
        settle().await;
        assert_eq!(rx.borrow().status, WatchStatus::running(42));

        supervisor.set_target("other", true);
        settle().await;
        assert_eq!(rx.borrow().status, WatchStatus::running(7));

        // Single surviving schedule.
        let before = probe.snapshot_count();
        advance(Duration::from_millis(2_000)).await;
        settle().await;
        assert_eq!(probe.snapshot_count(), before + 1);
    }
}
