//! Cross-thread submit-and-wait against a running scheduler.
//!
//! [`run_async`] is the one call surface: hand a future to a scheduler
//! obtained from `spindle-runtime`, then block the calling thread until the
//! future resolves or a caller-supplied timeout elapses. A timeout abandons
//! the wait only; the work keeps running on the scheduler and its eventual
//! result is discarded.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::mpsc;
use std::time::Duration;

use futures_util::FutureExt;
use spindle_runtime::SchedulerHandle;
use thiserror::Error;

/// Failure of the wait itself, as opposed to a timeout (which is an
/// ordinary `(None, false)` outcome) or a panic inside the work (which is
/// resumed on the calling thread).
#[derive(Debug, Error)]
pub enum RunError {
    /// The scheduler was shut down before the work could report back.
    #[error("scheduler is no longer running")]
    SchedulerGone,
}

/// Schedule `work` onto the scheduler and block until it resolves or
/// `timeout` elapses.
///
/// Returns `Ok((Some(value), true))` when the work completes in time and
/// `Ok((None, false))` when the timeout wins the race. `timeout: None`
/// waits indefinitely and therefore never yields the `false` flag.
///
/// The hand-off is non-blocking and safe from any thread, including the
/// scheduler's own. Blocking for the result from the scheduler thread
/// would deadlock the loop, however; callers already running on the
/// scheduler should use [`SchedulerHandle::submit`] instead.
///
/// # Panics
///
/// If the work panics before the timeout, the panic payload is re-raised
/// here on the calling thread. A panic after the caller has timed out is
/// discarded along with the result.
pub fn run_async<F>(
    work: F,
    scheduler: &SchedulerHandle,
    timeout: Option<Duration>,
) -> Result<(Option<F::Output>, bool), RunError>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);
    scheduler.submit(async move {
        let outcome = AssertUnwindSafe(work).catch_unwind().await;
        // A closed channel means the caller already timed out and left;
        // the outcome (value or panic payload) is dropped unobserved.
        let _ = tx.send(outcome);
    });

    let outcome = match timeout {
        Some(limit) => match rx.recv_timeout(limit) {
            Ok(outcome) => outcome,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::debug!(?limit, "wait timed out; work left running");
                return Ok((None, false));
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => return Err(RunError::SchedulerGone),
        },
        None => rx.recv().map_err(|_| RunError::SchedulerGone)?,
    };

    match outcome {
        Ok(value) => Ok((Some(value), true)),
        Err(payload) => std::panic::resume_unwind(payload),
    }
}
