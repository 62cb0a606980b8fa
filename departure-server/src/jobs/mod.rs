//! Units of work.
//!
//! Each operation (refresh departures, search lines, list stops, resolve and
//! probe a stop) runs as one spawned task, independent of whoever asked for
//! it. A unit reports zero or more [`WorkEvent::Error`] events and then
//! exactly one [`WorkEvent::Finished`], even after errors and even if the
//! task panics, so no caller waits forever.
//!
//! There is no cancellation. Dropping a [`WorkHandle`] abandons the result;
//! the task still runs to completion, bounded by its request timeouts.

mod error;
mod units;

use std::future::Future;

use tokio::sync::mpsc;
use tracing::warn;

pub use error::UnitError;
pub use units::{ProbeOutcome, departures, line_search, resolve_and_probe, stops_on_line};

/// An event emitted by a unit of work.
#[derive(Debug)]
pub enum WorkEvent<T> {
    Error(UnitError),
    Finished(T),
}

/// Error channel handed to a running unit.
#[derive(Debug)]
pub struct Reporter<T> {
    tx: mpsc::UnboundedSender<WorkEvent<T>>,
}

impl<T> Reporter<T> {
    /// Report a failure. The unit carries on.
    pub fn error(&self, error: UnitError) {
        warn!(error = %error, "unit of work reported an error");
        // The receiver may have been dropped; the unit still completes.
        let _ = self.tx.send(WorkEvent::Error(error));
    }
}

/// Everything a unit reported.
#[derive(Debug)]
pub struct WorkOutcome<T> {
    pub result: T,
    pub errors: Vec<UnitError>,
}

/// Receiving end of a unit of work.
#[derive(Debug)]
pub struct WorkHandle<T> {
    rx: mpsc::UnboundedReceiver<WorkEvent<T>>,
}

impl<T: Default> WorkHandle<T> {
    /// Next event, `None` once the terminal event has been taken.
    pub async fn next_event(&mut self) -> Option<WorkEvent<T>> {
        self.rx.recv().await
    }

    /// Wait for the terminal event, collecting errors on the way.
    pub async fn outcome(mut self) -> WorkOutcome<T> {
        let mut errors = Vec::new();
        while let Some(event) = self.rx.recv().await {
            match event {
                WorkEvent::Error(e) => errors.push(e),
                WorkEvent::Finished(result) => return WorkOutcome { result, errors },
            }
        }
        // Unreachable while the supervising task is alive; kept total anyway.
        WorkOutcome {
            result: T::default(),
            errors,
        }
    }
}

/// Run `work` as an independent task.
///
/// `work` receives a [`Reporter`] for its errors and returns its result,
/// which becomes the terminal event. A panic inside `work` is reported as
/// [`UnitError::Aborted`] followed by a default result.
pub fn spawn_unit<T, W, Fut>(work: W) -> WorkHandle<T>
where
    T: Default + Send + 'static,
    W: FnOnce(Reporter<T>) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(work(Reporter { tx: tx.clone() }));

    tokio::spawn(async move {
        let result = match task.await {
            Ok(result) => result,
            Err(e) => {
                let _ = tx.send(WorkEvent::Error(UnitError::Aborted(e.to_string())));
                T::default()
            }
        };
        let _ = tx.send(WorkEvent::Finished(result));
    });

    WorkHandle { rx }
}
