//! Watch a process by name and print status updates.
//!
//! Usage: cargo run --example watch -- <process-name>

use procwatch::{ProcessWatcher, WatcherConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let target = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "bash".to_string());

    let config = WatcherConfig::builder().target(target).build()?;
    let watcher = ProcessWatcher::new(config)?;
    let mut status = watcher.subscribe();

    watcher.init();
    while status.changed().await.is_ok() {
        let event = status.borrow().clone();
        match event.status.pid {
            Some(pid) => println!("{}: running (pid {pid})", event.key),
            None => println!("{}: not running", event.key),
        }
    }

    Ok(())
}
