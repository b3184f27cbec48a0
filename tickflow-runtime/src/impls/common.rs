// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
use crate::context::Schedule;

#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
use tickflow_error::{Result, TickflowError};

/// Reject schedules that would make a runtime timer spin or panic.
#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub(crate) fn check_schedule(schedule: &Schedule) -> Result<()> {
    if schedule.interval.is_zero() {
        return Err(TickflowError::timer_start("interval must be non-zero"));
    }
    Ok(())
}
