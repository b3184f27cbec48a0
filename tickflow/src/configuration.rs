// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::TimerSource;
use core::time::Duration;
use tickflow_core::Demand;
use tickflow_error::{Result, TickflowError};
use tickflow_runtime::{ExecutionContext, Schedule};

/// Immutable parameters of a timer.
///
/// - `context` - where firings run and where timestamps come from
/// - `interval` - time between two firings, never zero
/// - `leeway` - how late a firing may be
/// - `repetition_count` - the most values a single subscription emits;
///   `Demand::none()` completes every subscription on its first request
#[derive(Debug, Clone)]
pub struct TimerConfiguration<C> {
    context: C,
    interval: Duration,
    leeway: Duration,
    repetition_count: Demand,
}

impl<C: ExecutionContext> TimerConfiguration<C> {
    /// # Errors
    ///
    /// Returns `TickflowError::InvalidConfiguration` if `interval` is zero.
    pub fn new(
        context: C,
        interval: Duration,
        leeway: Duration,
        repetition_count: Demand,
    ) -> Result<Self> {
        if interval.is_zero() {
            return Err(TickflowError::invalid_configuration(
                "interval must be non-zero",
            ));
        }

        Ok(Self {
            context,
            interval,
            leeway,
            repetition_count,
        })
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn leeway(&self) -> Duration {
        self.leeway
    }

    pub fn repetition_count(&self) -> Demand {
        self.repetition_count
    }

    pub(crate) fn schedule(&self) -> Schedule {
        Schedule::new(self.interval, self.leeway)
    }
}

/// Builder for [`TimerSource`].
///
/// Defaults: zero leeway, unlimited repetitions, and the default execution
/// context of the enabled runtime feature unless [`context`](Self::context)
/// is called.
///
/// ```
/// use std::time::Duration;
/// use tickflow::{Demand, TimerSource};
/// use tickflow_test_utils::ManualContext;
///
/// let source = TimerSource::builder_with_context(ManualContext::new(), Duration::from_millis(10))
///     .leeway(Duration::from_millis(1))
///     .repeat_times(Demand::max(3))
///     .build()
///     .unwrap();
///
/// assert_eq!(source.configuration().repetition_count(), Demand::max(3));
/// ```
#[derive(Debug, Clone)]
pub struct TimerSourceBuilder<C> {
    context: C,
    interval: Duration,
    leeway: Duration,
    repetition_count: Demand,
}

impl<C: ExecutionContext> TimerSourceBuilder<C> {
    pub(crate) fn new(context: C, interval: Duration) -> Self {
        Self {
            context,
            interval,
            leeway: Duration::ZERO,
            repetition_count: Demand::unlimited(),
        }
    }

    /// Run firings on `context` instead.
    #[must_use]
    pub fn context<C2: ExecutionContext>(self, context: C2) -> TimerSourceBuilder<C2> {
        TimerSourceBuilder {
            context,
            interval: self.interval,
            leeway: self.leeway,
            repetition_count: self.repetition_count,
        }
    }

    #[must_use]
    pub fn leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Limit how many values each subscription emits.
    #[must_use]
    pub fn repeat_times(mut self, repetition_count: impl Into<Demand>) -> Self {
        self.repetition_count = repetition_count.into();
        self
    }

    /// # Errors
    ///
    /// Returns `TickflowError::InvalidConfiguration` if the interval is zero.
    pub fn build(self) -> Result<TimerSource<C>> {
        TimerConfiguration::new(
            self.context,
            self.interval,
            self.leeway,
            self.repetition_count,
        )
        .map(TimerSource::new)
    }
}
