//! Dedicated scheduler host for Spindle.
//!
//! This crate owns exactly one concern: running a cooperative,
//! single-threaded scheduler on its own background OS thread, and handing
//! out a thread-safe reference for submitting work onto it. Every
//! acquisition creates an independent scheduler/thread pair; nothing is
//! shared between acquisitions.
//!
//! The scheduler thread is detached by default. Dropping the [`Scheduler`]
//! leaves the thread parked in its event loop for the rest of the process
//! lifetime; only the explicit [`Scheduler::shutdown`] capability stops it.

mod host;

pub use host::{Scheduler, SchedulerError, SchedulerHandle};
