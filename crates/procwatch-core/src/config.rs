use crate::error::WatchError;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main watcher configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Builder)]
#[builder(setter(into, strip_option))]
#[serde(rename_all = "camelCase")]
pub struct WatcherConfig {
    /// Process name to watch at startup. The target can also be set (or
    /// swapped) later through the supervisor's lifecycle operations.
    #[serde(default)]
    #[builder(default)]
    pub target: Option<String>,

    /// Delay between poll cycles (in milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    #[builder(default = "default_poll_interval_ms()")]
    pub poll_interval_ms: u64,

    /// Event key carried on every published status update
    #[serde(default = "default_event_key")]
    #[builder(default = "default_event_key()")]
    pub event_key: String,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            target: None,
            poll_interval_ms: default_poll_interval_ms(),
            event_key: default_event_key(),
        }
    }
}

impl WatcherConfig {
    pub fn builder() -> WatcherConfigBuilder {
        WatcherConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid
    pub fn validate(&self) -> Result<(), WatchError> {
        if self.poll_interval_ms == 0 {
            return Err(WatchError::InvalidConfig(
                "poll_interval_ms must be non-zero".to_string(),
            ));
        }

        if let Some(target) = &self.target {
            if target.trim().is_empty() {
                return Err(WatchError::InvalidConfig(
                    "target must be a non-empty process name".to_string(),
                ));
            }
        }

        if self.event_key.is_empty() {
            return Err(WatchError::InvalidConfig(
                "event_key must be non-empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// Default value functions for serde
fn default_poll_interval_ms() -> u64 {
    2_000
}
fn default_event_key() -> String {
    "custom-process-status".to_string()
}
