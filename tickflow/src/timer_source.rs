// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::configuration::{TimerConfiguration, TimerSourceBuilder};
use crate::tick_stream::{TickStream, DEFAULT_TICK_BUFFER};
use crate::timer_subscription::TimerSubscription;
use core::time::Duration;
use std::sync::Arc;
use tickflow_core::{Publisher, Subscriber};
use tickflow_runtime::ExecutionContext;

#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
use tickflow_runtime::DefaultContext;

/// A cold timer publisher.
///
/// Nothing runs until a subscriber requests demand. Each subscription gets
/// its own engine and its own underlying timer; subscriptions share nothing
/// but the configuration.
#[derive(Debug, Clone)]
pub struct TimerSource<C> {
    configuration: TimerConfiguration<C>,
}

#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
impl TimerSource<DefaultContext> {
    /// Start building a timer on the default execution context.
    pub fn builder(interval: Duration) -> TimerSourceBuilder<DefaultContext> {
        TimerSourceBuilder::new(DefaultContext::default(), interval)
    }
}

impl<C: ExecutionContext> TimerSource<C> {
    pub fn new(configuration: TimerConfiguration<C>) -> Self {
        Self { configuration }
    }

    /// Start building a timer on `context`.
    pub fn builder_with_context(context: C, interval: Duration) -> TimerSourceBuilder<C> {
        TimerSourceBuilder::new(context, interval)
    }

    pub fn configuration(&self) -> &TimerConfiguration<C> {
        &self.configuration
    }

    /// Subscribe and keep a typed handle to the new subscription.
    ///
    /// Same as [`Publisher::subscribe`], but the caller can also inspect the
    /// engine's phase and counters. The subscription lives as long as some
    /// handle to it does, the subscriber's included.
    pub fn attach<S>(&self, subscriber: Arc<S>) -> Arc<TimerSubscription<S, C>>
    where
        S: Subscriber<Input = C::Instant>,
    {
        let subscription = TimerSubscription::new(subscriber.clone(), self.configuration.clone());
        subscriber.on_subscribe(subscription.clone());
        subscription
    }

    /// Expose this timer as a `Stream` of timestamps.
    pub fn ticks(self) -> TickStream<C> {
        self.ticks_with_capacity(DEFAULT_TICK_BUFFER)
    }

    /// Like [`ticks`](Self::ticks), buffering at most `capacity` unread ticks.
    pub fn ticks_with_capacity(self, capacity: usize) -> TickStream<C> {
        TickStream::new(self, capacity)
    }
}

impl<C: ExecutionContext> Publisher for TimerSource<C> {
    type Output = C::Instant;

    fn subscribe<S>(&self, subscriber: Arc<S>)
    where
        S: Subscriber<Input = Self::Output>,
    {
        let _subscription = self.attach(subscriber);
    }
}
