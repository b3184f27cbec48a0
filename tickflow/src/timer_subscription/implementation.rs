// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::state::{EngineState, SubscriptionPhase};
use crate::TimerConfiguration;
use core::cell::RefCell;
use core::fmt;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::sync::{Arc, Weak};
use tickflow_core::{Demand, Subscriber, Subscription};
use tickflow_error::TickflowError;
use tickflow_runtime::{ExecutionContext, TickHandler};

type StateGuard<'a, S> = ReentrantMutexGuard<'a, RefCell<EngineState<S>>>;

/// The per-subscriber engine behind a [`TimerSource`](crate::TimerSource).
///
/// Owns the repetition counter, the outstanding demand, the running timer
/// and the reference to the subscriber. All of them live behind one
/// reentrant lock:
///
/// - other threads are excluded for the whole of a firing, a request or a
///   cancel, so counter updates and completion are atomic with respect to
///   each other;
/// - the subscriber's callbacks run with the lock held but without the
///   inner `RefCell` borrowed, so a callback may call back into
///   [`request`](Subscription::request) or [`cancel`](Subscription::cancel)
///   on the same thread.
///
/// The timer callback only holds a weak reference: dropping every handle
/// to the subscription stops the timer.
pub struct TimerSubscription<S, C>
where
    S: Subscriber<Input = C::Instant>,
    C: ExecutionContext,
{
    configuration: TimerConfiguration<C>,
    state: ReentrantMutex<RefCell<EngineState<S>>>,
    this: Weak<Self>,
}

impl<S, C> TimerSubscription<S, C>
where
    S: Subscriber<Input = C::Instant>,
    C: ExecutionContext,
{
    pub(crate) fn new(subscriber: Arc<S>, configuration: TimerConfiguration<C>) -> Arc<Self> {
        let repetition_count = configuration.repetition_count();
        Arc::new_cyclic(|this| Self {
            configuration,
            state: ReentrantMutex::new(RefCell::new(EngineState::new(
                subscriber,
                repetition_count,
            ))),
            this: this.clone(),
        })
    }

    pub fn phase(&self) -> SubscriptionPhase {
        self.state.lock().borrow().phase
    }

    /// Returns `true` once the subscription completed, was cancelled or
    /// failed to start its timer.
    pub fn is_terminated(&self) -> bool {
        self.phase() == SubscriptionPhase::Terminal
    }

    pub fn outstanding_demand(&self) -> Demand {
        self.state.lock().borrow().outstanding_demand
    }

    pub fn remaining_repetitions(&self) -> Demand {
        self.state.lock().borrow().remaining_repetitions
    }

    /// The error that kept the timer from starting.
    ///
    /// A subscription ended this way never delivers completion; this is the
    /// only way to tell it apart from one that is merely cancelled.
    pub fn failure(&self) -> Option<TickflowError> {
        self.state.lock().borrow().failure.clone()
    }

    /// Emit one value if the subscription is alive and has demand.
    ///
    /// Called by the timer on a worker of the execution context. A firing
    /// that arrives after cancellation, after completion or while demand is
    /// exhausted does nothing: stopping the timer is asynchronous, so such
    /// late firings are expected.
    pub(crate) fn fire(&self) {
        let guard = self.state.lock();

        let subscriber = {
            let mut state = guard.borrow_mut();
            let Some(subscriber) = state.subscriber.clone() else {
                trace!("timer fired after termination, ignoring");
                return;
            };
            if state.outstanding_demand.is_none() {
                trace!("timer fired without outstanding demand, ignoring");
                return;
            }
            state.outstanding_demand -= 1;
            state.remaining_repetitions -= 1;
            subscriber
        };

        let additional = subscriber.on_value(self.configuration.context().now());

        let completed = {
            let mut state = guard.borrow_mut();
            if state.is_terminal() {
                // Cancelled or completed from inside `on_value`
                None
            } else {
                state.outstanding_demand += additional;
                trace!(
                    outstanding = %state.outstanding_demand,
                    remaining = %state.remaining_repetitions,
                    "tick emitted"
                );
                if state.is_exhausted() {
                    state.finish()
                } else {
                    None
                }
            }
        };

        if let Some(subscriber) = completed {
            debug!("timer subscription completed");
            subscriber.on_complete();
        }
    }

    fn start_timer(&self, guard: &StateGuard<'_, S>) {
        let this = self.this.clone();
        let handler: TickHandler = Arc::new(move || {
            if let Some(subscription) = this.upgrade() {
                subscription.fire();
            }
        });

        match self
            .configuration
            .context()
            .schedule_repeating(self.configuration.schedule(), handler)
        {
            Ok(timer) => {
                debug!(
                    interval = ?self.configuration.interval(),
                    leeway = ?self.configuration.leeway(),
                    "timer started"
                );
                let mut state = guard.borrow_mut();
                if state.is_terminal() {
                    timer.cancel();
                } else {
                    state.timer = Some(timer);
                }
            }
            Err(err) => {
                error!("failed to start timer, ending subscription: {}", err);
                // Fatal to the subscription; completing here would tell the
                // subscriber the ticks ran their course
                let abandoned = {
                    let mut state = guard.borrow_mut();
                    state.failure = Some(err);
                    state.finish()
                };
                drop(abandoned);
            }
        }
    }
}

impl<S, C> Subscription for TimerSubscription<S, C>
where
    S: Subscriber<Input = C::Instant>,
    C: ExecutionContext,
{
    fn request(&self, demand: Demand) {
        let guard = self.state.lock();

        let action = {
            let mut state = guard.borrow_mut();
            if state.is_terminal() {
                return;
            }

            if state.remaining_repetitions.is_none() {
                RequestAction::Complete(state.finish())
            } else {
                state.outstanding_demand = demand;
                if state.phase == SubscriptionPhase::Idle && demand.is_some() {
                    state.phase = SubscriptionPhase::Active;
                    RequestAction::StartTimer
                } else {
                    RequestAction::Updated
                }
            }
        };

        match action {
            RequestAction::Complete(Some(subscriber)) => {
                debug!("repetition count exhausted before start, completing");
                subscriber.on_complete();
            }
            RequestAction::StartTimer => self.start_timer(&guard),
            RequestAction::Complete(None) | RequestAction::Updated => {}
        }
    }

    fn cancel(&self) {
        let guard = self.state.lock();
        let released = guard.borrow_mut().finish();
        if released.is_some() {
            debug!("timer subscription cancelled");
        }
        drop(released);
    }
}

enum RequestAction<S> {
    Complete(Option<Arc<S>>),
    StartTimer,
    Updated,
}

impl<S, C> fmt::Debug for TimerSubscription<S, C>
where
    S: Subscriber<Input = C::Instant>,
    C: ExecutionContext,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.state.lock();
        let mut debug = f.debug_struct("TimerSubscription");
        match guard.try_borrow() {
            Ok(state) => debug
                .field("phase", &state.phase)
                .field("remaining_repetitions", &state.remaining_repetitions)
                .field("outstanding_demand", &state.outstanding_demand)
                .field("timer_running", &state.timer.is_some())
                .field("failure", &state.failure),
            Err(_) => debug.field("state", &"<borrowed>"),
        };
        debug.finish()
    }
}
