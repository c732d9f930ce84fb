//! Procwatch - external-process liveness supervision
//!
//! Given a target process name, the watcher periodically checks whether a
//! matching OS process is running (and its pid) and publishes that status to
//! subscribers. It also owns lifecycle control: starting and stopping
//! monitoring, swapping the watched name, and best-effort termination of the
//! watched process.
//!
//! ```rust,no_run
//! use procwatch::{ProcessWatcher, WatcherConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = WatcherConfig::builder().target("mygame.exe").build()?;
//! let watcher = ProcessWatcher::new(config)?;
//! let mut status = watcher.subscribe();
//!
//! watcher.init();
//! while status.changed().await.is_ok() {
//!     let event = status.borrow().clone();
//!     println!("{}: running={}", event.key, event.status.is_running);
//! }
//! # Ok(())
//! # }
//! ```

mod factory;
mod watcher;

pub use factory::PlatformProbeFactory;
pub use watcher::ProcessWatcher;

// Re-export core functionality
pub use procwatch_core::*;
