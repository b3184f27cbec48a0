// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[cfg(feature = "runtime-tokio")]
use crate::context::{ExecutionContext, Schedule, TickHandler, TimerHandle};

#[cfg(feature = "runtime-tokio")]
use super::common::check_schedule;

#[cfg(feature = "runtime-tokio")]
use tickflow_core::CancellationToken;

#[cfg(feature = "runtime-tokio")]
use tickflow_error::{Result, TickflowError};

#[cfg(feature = "runtime-tokio")]
use tokio::{
    runtime::Handle,
    time::{interval_at, Instant, MissedTickBehavior},
};

/// Runs timers as tasks on a tokio runtime.
///
/// Without an explicit handle the runtime is looked up when a timer starts,
/// so the context can be built anywhere but must start timers from inside a
/// runtime.
///
/// Timestamps are `tokio::time::Instant`, which follows tokio's paused clock
/// in tests.
#[cfg(feature = "runtime-tokio")]
#[derive(Clone, Debug, Default)]
pub struct TokioContext {
    handle: Option<Handle>,
}

#[cfg(feature = "runtime-tokio")]
impl TokioContext {
    /// A context bound to whichever runtime is current when a timer starts.
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// A context bound to a specific runtime.
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// A context bound to the runtime the caller is running on.
    ///
    /// # Errors
    ///
    /// Returns `TickflowError::NoRuntime` outside of a tokio runtime.
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::with_handle)
            .map_err(|err| TickflowError::no_runtime(format!("tokio context: {err}")))
    }

    fn runtime_handle(&self) -> Result<Handle> {
        match &self.handle {
            Some(handle) => Ok(handle.clone()),
            None => Handle::try_current()
                .map_err(|err| TickflowError::no_runtime(format!("tokio context: {err}"))),
        }
    }
}

#[cfg(feature = "runtime-tokio")]
impl ExecutionContext for TokioContext {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn schedule_repeating(&self, schedule: Schedule, handler: TickHandler) -> Result<TimerHandle> {
        check_schedule(&schedule)?;
        let runtime = self.runtime_handle()?;

        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let start = Instant::now() + schedule.interval;
        // Zero leeway keeps every tick on the original grid, catching up
        // after a stall; otherwise late ticks shift the grid
        let missed = if schedule.leeway.is_zero() {
            MissedTickBehavior::Burst
        } else {
            MissedTickBehavior::Delay
        };

        runtime.spawn(async move {
            let mut ticks = interval_at(start, schedule.interval);
            ticks.set_missed_tick_behavior(missed);
            loop {
                tokio::select! {
                    biased;
                    () = task_cancel.cancelled() => break,
                    _ = ticks.tick() => {
                        if task_cancel.is_cancelled() {
                            break;
                        }
                        handler();
                    }
                }
            }
        });

        Ok(TimerHandle::new(cancel))
    }
}
