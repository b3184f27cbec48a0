// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tickflow_core::CancellationToken;
use tickflow_error::{Result, TickflowError};
use tickflow_runtime::{ExecutionContext, Schedule, TickHandler, TimerHandle};

/// An execution context whose timers only fire when the test says so.
///
/// The clock is virtual: it starts at zero and moves forward by a timer's
/// interval every time that timer is fired. Clones share the same timers
/// and clock, so a test can keep one clone while the timer under test owns
/// another.
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
/// use tickflow_runtime::{ExecutionContext, Schedule};
/// use tickflow_test_utils::ManualContext;
///
/// let context = ManualContext::new();
/// let fired = Arc::new(AtomicUsize::new(0));
/// let counter = fired.clone();
/// let _handle = context
///     .schedule_repeating(
///         Schedule::new(Duration::from_secs(1), Duration::ZERO),
///         Arc::new(move || {
///             counter.fetch_add(1, Ordering::SeqCst);
///         }),
///     )
///     .unwrap();
///
/// context.fire();
/// context.fire();
/// assert_eq!(fired.load(Ordering::SeqCst), 2);
/// assert_eq!(context.now(), Duration::from_secs(2));
/// ```
#[derive(Clone, Default)]
pub struct ManualContext {
    state: Arc<Mutex<ManualState>>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    timers: Vec<ManualTimer>,
    next_failure: Option<TickflowError>,
}

struct ManualTimer {
    schedule: Schedule,
    handler: TickHandler,
    cancel: CancellationToken,
}

impl ManualContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `schedule_repeating` call fail with `error`.
    pub fn fail_next_schedule(&self, error: TickflowError) {
        self.state.lock().next_failure = Some(error);
    }

    /// Fire every timer that has not been cancelled. Returns how many fired.
    pub fn fire(&self) -> usize {
        self.fire_matching(|timer| !timer.cancel.is_cancelled())
    }

    /// Fire every timer ever scheduled, cancelled or not.
    ///
    /// Models a firing that was already queued when the timer was cancelled.
    pub fn fire_including_cancelled(&self) -> usize {
        self.fire_matching(|_| true)
    }

    /// Fire `times` rounds of [`ManualContext::fire`]. Returns the total.
    pub fn fire_times(&self, times: usize) -> usize {
        (0..times).map(|_| self.fire()).sum()
    }

    /// Number of timers ever started on this context.
    pub fn timers_created(&self) -> usize {
        self.state.lock().timers.len()
    }

    /// Number of started timers that have not been cancelled.
    pub fn active_timers(&self) -> usize {
        self.state
            .lock()
            .timers
            .iter()
            .filter(|timer| !timer.cancel.is_cancelled())
            .count()
    }

    /// The schedule of the most recently started timer.
    pub fn last_schedule(&self) -> Option<Schedule> {
        self.state.lock().timers.last().map(|timer| timer.schedule)
    }

    fn fire_matching(&self, filter: impl Fn(&ManualTimer) -> bool) -> usize {
        // Handlers run without the state lock held: they may re-enter the
        // context through `now()` or by cancelling their handle
        let handlers: Vec<TickHandler> = {
            let mut state = self.state.lock();
            let selected: Vec<(Duration, TickHandler)> = state
                .timers
                .iter()
                .filter(|timer| filter(timer))
                .map(|timer| (timer.schedule.interval, timer.handler.clone()))
                .collect();
            if let Some(step) = selected.iter().map(|(interval, _)| *interval).min() {
                state.now += step;
            }
            selected.into_iter().map(|(_, handler)| handler).collect()
        };

        for handler in &handlers {
            handler();
        }
        handlers.len()
    }
}

impl ExecutionContext for ManualContext {
    type Instant = Duration;

    fn now(&self) -> Self::Instant {
        self.state.lock().now
    }

    fn schedule_repeating(&self, schedule: Schedule, handler: TickHandler) -> Result<TimerHandle> {
        let mut state = self.state.lock();
        if let Some(error) = state.next_failure.take() {
            return Err(error);
        }

        let cancel = CancellationToken::new();
        state.timers.push(ManualTimer {
            schedule,
            handler,
            cancel: cancel.clone(),
        });
        Ok(TimerHandle::new(cancel))
    }
}

impl fmt::Debug for ManualContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ManualContext")
            .field("now", &state.now)
            .field("timers", &state.timers.len())
            .finish()
    }
}
