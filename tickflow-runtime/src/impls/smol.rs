// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[cfg(feature = "runtime-smol")]
use crate::context::{ExecutionContext, Schedule, TickHandler, TimerHandle};

#[cfg(feature = "runtime-smol")]
use super::common::check_schedule;

#[cfg(feature = "runtime-smol")]
use futures::future::{self, Either};

#[cfg(feature = "runtime-smol")]
use futures::StreamExt;

#[cfg(feature = "runtime-smol")]
use std::time::Instant;

#[cfg(feature = "runtime-smol")]
use tickflow_core::CancellationToken;

#[cfg(feature = "runtime-smol")]
use tickflow_error::Result;

/// Runs timers as detached tasks on smol's global executor.
///
/// `async-io` timers have no notion of leeway; the schedule's leeway is
/// ignored.
#[cfg(feature = "runtime-smol")]
#[derive(Clone, Debug, Default)]
pub struct SmolContext;

#[cfg(feature = "runtime-smol")]
impl ExecutionContext for SmolContext {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn schedule_repeating(&self, schedule: Schedule, handler: TickHandler) -> Result<TimerHandle> {
        check_schedule(&schedule)?;

        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let start = Instant::now() + schedule.interval;

        smol::spawn(async move {
            let mut ticks = async_io::Timer::interval_at(start, schedule.interval);
            loop {
                let cancelled = core::pin::pin!(task_cancel.cancelled());
                match future::select(cancelled, ticks.next()).await {
                    Either::Left(_) | Either::Right((None, _)) => break,
                    Either::Right((Some(_), _)) => {
                        if task_cancel.is_cancelled() {
                            break;
                        }
                        handler();
                    }
                }
            }
        })
        .detach();

        Ok(TimerHandle::new(cancel))
    }
}
