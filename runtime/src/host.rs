//! The scheduler host: one current-thread runtime parked on one named
//! OS thread, plus the clonable handle used to feed it work.

use std::future::Future;
use std::io;
use std::thread;

use thiserror::Error;
use tokio::runtime;
use tokio::sync::oneshot;

const SCHEDULER_THREAD_NAME: &str = "spindle-scheduler";

/// Failures while bringing a scheduler up. Both are fatal to the
/// acquisition; nothing is retried.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("failed to build the scheduler runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("failed to spawn the scheduler thread: {0}")]
    Thread(#[source] io::Error),
}

/// Thread-safe reference to a running scheduler.
///
/// Cheap to clone and safe to share across threads. A handle stays usable
/// for as long as the scheduler thread is alive, which is the rest of the
/// process lifetime unless [`Scheduler::shutdown`] is called.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    inner: runtime::Handle,
}

impl SchedulerHandle {
    /// Submit work to the scheduler without waiting for its result.
    ///
    /// The hand-off never blocks, so this is safe to call from any thread,
    /// including from inside work already running on the scheduler. The
    /// work's output is discarded; a panic inside the work is caught by the
    /// scheduler and discarded as well, leaving the loop running.
    ///
    /// If the scheduler has been shut down, the work is dropped without
    /// ever being polled.
    pub fn submit<F>(&self, work: F)
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        drop(self.inner.spawn(work));
    }
}

/// A running scheduler: the scoped result of [`Scheduler::acquire`].
///
/// Owns the dedicated thread and the only means of stopping it. The value
/// itself is deliberately inert on drop: letting a `Scheduler` go out of
/// scope abandons the thread in its loop rather than tearing it down, so
/// handles obtained earlier keep working.
#[derive(Debug)]
pub struct Scheduler {
    handle: SchedulerHandle,
    stop: oneshot::Sender<()>,
    thread: thread::JoinHandle<()>,
}

impl Scheduler {
    /// Build a fresh single-threaded scheduler and start its thread.
    ///
    /// Each call yields a fully independent scheduler/thread pair. Runtime
    /// construction or thread spawn failures surface as [`SchedulerError`].
    pub fn acquire() -> Result<Self, SchedulerError> {
        let runtime = runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SchedulerError::Runtime)?;
        let handle = SchedulerHandle {
            inner: runtime.handle().clone(),
        };
        let (stop, stop_rx) = oneshot::channel();
        let thread = thread::Builder::new()
            .name(SCHEDULER_THREAD_NAME.to_owned())
            .spawn(move || run_loop(runtime, stop_rx))
            .map_err(SchedulerError::Thread)?;
        tracing::debug!(thread = SCHEDULER_THREAD_NAME, "scheduler thread started");
        Ok(Self {
            handle,
            stop,
            thread,
        })
    }

    /// A clonable handle for submitting work onto this scheduler.
    #[must_use]
    pub fn handle(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    /// Stop the scheduler loop and join its thread.
    ///
    /// This is the supervised escape hatch for callers (tests, mostly) that
    /// cannot tolerate a leaked thread. Work still queued on the scheduler
    /// is dropped unpolled. Outstanding handles remain safe to use but
    /// every submission through them is silently dropped.
    pub fn shutdown(self) {
        tracing::debug!("scheduler shutdown requested");
        if self.stop.send(()).is_err() {
            return;
        }
        if self.thread.join().is_err() {
            tracing::warn!("scheduler thread panicked during shutdown");
        }
    }
}

fn run_loop(runtime: runtime::Runtime, stop: oneshot::Receiver<()>) {
    runtime.block_on(async move {
        // A dropped Scheduler closes the stop channel without sending; the
        // loop must keep running in that case, so park forever instead of
        // treating the closed channel as a stop request.
        match stop.await {
            Ok(()) => {}
            Err(_) => std::future::pending::<()>().await,
        }
    });
    tracing::debug!("scheduler thread stopping");
}
