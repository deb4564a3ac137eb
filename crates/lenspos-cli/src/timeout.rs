use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};

/// Run `task` on a worker thread and wait at most `limit` for it.
///
/// The solvers have no cancellation points, so a timed-out worker is left to
/// finish in the background and its result is discarded.
pub fn run_with_timeout<T, F>(limit: Option<Duration>, task: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let Some(limit) = limit else {
        return Ok(task());
    };

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(task());
    });

    rx.recv_timeout(limit).map_err(|e| match e {
        RecvTimeoutError::Timeout => {
            anyhow!("Solve did not finish within {:.1}s", limit.as_secs_f64())
        }
        RecvTimeoutError::Disconnected => anyhow!("Solver thread exited without a result"),
    })
}

/// Parse a `--timeout` value in seconds.
pub fn parse_timeout(seconds: Option<f64>) -> Result<Option<Duration>> {
    seconds
        .map(|s| Duration::try_from_secs_f64(s).map_err(|e| anyhow!("Invalid timeout {s}: {e}")))
        .transpose()
}
