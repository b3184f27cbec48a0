// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tickflow_core::CancellationToken;
use tickflow_error::Result;

/// Callback invoked on every firing of a repeating timer.
pub type TickHandler = Arc<dyn Fn() + Send + Sync>;

/// When a repeating timer fires.
///
/// The first firing happens one `interval` after scheduling, then every
/// `interval` after that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Time between two firings.
    pub interval: Duration,
    /// How late a firing may be. Contexts use it as a hint for how strictly
    /// to keep the schedule when the worker falls behind.
    pub leeway: Duration,
}

impl Schedule {
    pub fn new(interval: Duration, leeway: Duration) -> Self {
        Self { interval, leeway }
    }
}

/// Something that can run a repeating callback on one of its workers.
///
/// Firings may arrive on any worker thread and may race with whatever the
/// caller does concurrently; the handler is responsible for its own
/// synchronization.
pub trait ExecutionContext: Clone + Send + Sync + Debug + 'static {
    /// Timestamp type produced by [`ExecutionContext::now`].
    type Instant: Copy + Debug + Ord + Send + Sync + 'static;

    /// The current time as seen by this context's clock.
    fn now(&self) -> Self::Instant;

    /// Start a repeating timer.
    ///
    /// # Errors
    ///
    /// Returns `TickflowError::NoRuntime` or `TickflowError::TimerStart` if
    /// the context cannot host the timer.
    fn schedule_repeating(&self, schedule: Schedule, handler: TickHandler) -> Result<TimerHandle>;
}

/// Owner of a running timer. Dropping it stops the timer.
///
/// Stopping is a request: a firing that is already under way, or that the
/// worker picks up before it notices the request, still runs.
#[derive(Debug)]
pub struct TimerHandle {
    cancel: CancellationToken,
}

impl TimerHandle {
    /// Wrap the token the timer task watches.
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Ask the timer to stop. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
