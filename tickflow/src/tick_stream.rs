// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A [`TimerSource`] seen as a `futures::Stream` of timestamps.
//!
//! The stream subscribes on its first poll and paces demand one tick at a
//! time, so it runs until the repetition count is reached or until it is
//! dropped. Ticks wait in a bounded buffer; a tick that finds the buffer
//! full is dropped, so a slow reader sees gaps rather than growing memory.
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use std::time::Duration;
//! use tickflow::{Demand, TimerSource};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let ticks = TimerSource::builder(Duration::from_millis(100))
//!     .repeat_times(Demand::max(3))
//!     .build()?
//!     .ticks();
//!
//! let instants: Vec<_> = ticks.collect().await;
//! assert_eq!(instants.len(), 3);
//! # Ok(())
//! # }
//! ```

use crate::{TimerSource, TimerSubscription};
use async_channel::{Receiver, Sender, TrySendError};
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::Stream;
use std::sync::Arc;
use tickflow_core::{Demand, Subscriber, Subscription};
use tickflow_error::TickflowError;
use tickflow_runtime::ExecutionContext;

pub(crate) const DEFAULT_TICK_BUFFER: usize = 16;

/// Stream of timestamps produced by [`TimerSource::ticks`].
///
/// Ends when the subscription completes. Dropping it cancels the
/// subscription and stops the timer.
pub struct TickStream<C: ExecutionContext> {
    source: Option<TimerSource<C>>,
    capacity: usize,
    receiver: Option<Pin<Box<Receiver<C::Instant>>>>,
    subscription: Option<Arc<TimerSubscription<TickForwarder<C::Instant>, C>>>,
}

impl<C: ExecutionContext> TickStream<C> {
    pub(crate) fn new(source: TimerSource<C>, capacity: usize) -> Self {
        Self {
            source: Some(source),
            capacity: capacity.max(1),
            receiver: None,
            subscription: None,
        }
    }

    fn subscribe(&mut self, source: &TimerSource<C>) -> Pin<Box<Receiver<C::Instant>>> {
        let (tx, rx) = async_channel::bounded(self.capacity);
        let subscriber = Arc::new(TickForwarder { sender: tx });
        self.subscription = Some(source.attach(subscriber));
        Box::pin(rx)
    }

    /// The error that kept the timer from starting, if any.
    ///
    /// Check it once the stream has ended: `None` means the stream ran its
    /// course or has not been polled yet.
    pub fn failure(&self) -> Option<TickflowError> {
        self.subscription
            .as_ref()
            .and_then(|subscription| subscription.failure())
    }
}

impl<C: ExecutionContext> Stream for TickStream<C> {
    type Item = C::Instant;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(source) = self.source.take() {
            let receiver = self.subscribe(&source);
            self.receiver = Some(receiver);
        }

        match self.receiver.as_mut() {
            Some(receiver) => receiver.as_mut().poll_next(cx),
            None => Poll::Ready(None),
        }
    }
}

impl<C: ExecutionContext> Unpin for TickStream<C> {}

impl<C: ExecutionContext> Drop for TickStream<C> {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }
}

/// Subscriber that forwards ticks into the stream's buffer.
struct TickForwarder<I> {
    sender: Sender<I>,
}

impl<I: Send + 'static> Subscriber for TickForwarder<I> {
    type Input = I;

    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        subscription.request(Demand::max(1));
    }

    fn on_value(&self, input: I) -> Demand {
        match self.sender.try_send(input) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                debug!("tick buffer full, dropping tick");
            }
            Err(TrySendError::Closed(_)) => {
                trace!("tick stream dropped, ignoring tick");
            }
        }
        Demand::max(1)
    }

    fn on_complete(&self) {
        self.sender.close();
    }
}
