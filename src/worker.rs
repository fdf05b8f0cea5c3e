//! Off-thread execution of blocking HTTP calls.
//!
//! Controller state is `Rc`-based and stays on the UI thread. A job runs on
//! its own short-lived thread and its result is awaited from a
//! `slint::spawn_local` task, so it is applied back on the event loop.

use anyhow::{Context, Result, anyhow};
use futures::channel::oneshot;

/// Run `job` on a named worker thread and await its return value.
pub async fn run_blocking<T, F>(name: &str, job: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    std::thread::Builder::new()
        .name(format!("roi-{name}"))
        .spawn(move || {
            // Receiver is gone only if the UI task was dropped.
            let _ = tx.send(job());
        })
        .with_context(|| format!("Failed to spawn {name} worker"))?;

    rx.await
        .map_err(|_| anyhow!("{name} worker exited without a result"))
}
