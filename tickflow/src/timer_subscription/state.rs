// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;
use tickflow_core::Demand;
use tickflow_error::TickflowError;
use tickflow_runtime::TimerHandle;

/// Where a [`TimerSubscription`](super::TimerSubscription) is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionPhase {
    /// Created; the timer has not been started.
    Idle,
    /// The timer has been started and values may still be emitted.
    Active,
    /// Completed or cancelled. Nothing is emitted anymore.
    Terminal,
}

pub(crate) struct EngineState<S> {
    pub(crate) phase: SubscriptionPhase,
    pub(crate) remaining_repetitions: Demand,
    pub(crate) outstanding_demand: Demand,
    pub(crate) timer: Option<TimerHandle>,
    pub(crate) subscriber: Option<Arc<S>>,
    /// Why the timer could not be started, if it could not.
    pub(crate) failure: Option<TickflowError>,
}

impl<S> EngineState<S> {
    pub(crate) fn new(subscriber: Arc<S>, repetition_count: Demand) -> Self {
        Self {
            phase: SubscriptionPhase::Idle,
            remaining_repetitions: repetition_count,
            outstanding_demand: Demand::none(),
            timer: None,
            subscriber: Some(subscriber),
            failure: None,
        }
    }

    pub(crate) fn is_terminal(&self) -> bool {
        self.phase == SubscriptionPhase::Terminal
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.remaining_repetitions.is_none() || self.outstanding_demand.is_none()
    }

    /// Move to `Terminal`, stopping the timer and releasing the subscriber.
    ///
    /// Returns the subscriber only on the first call, so whoever gets it is
    /// the one allowed to deliver completion.
    pub(crate) fn finish(&mut self) -> Option<Arc<S>> {
        self.phase = SubscriptionPhase::Terminal;
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        self.subscriber.take()
    }
}
