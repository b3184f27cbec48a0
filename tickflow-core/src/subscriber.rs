// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The pull protocol between a publisher and its subscribers.
//!
//! A [`Publisher`] hands every new [`Subscriber`] a [`Subscription`]. The
//! subscriber uses it to grant [`Demand`]; the publisher never emits more
//! values than were granted. Each delivered value may grant more demand
//! through the return value of [`Subscriber::on_value`].
//!
//! There is no error channel: a subscription ends with
//! [`Subscriber::on_complete`] or with a cancel.

use crate::Demand;
use alloc::sync::Arc;

/// Handle a subscriber uses to drive its subscription.
///
/// Both methods may be called from any thread, any number of times,
/// including from inside the subscriber's own callbacks.
pub trait Subscription: Send + Sync {
    /// Tell the publisher how many values the subscriber currently accepts.
    ///
    /// Each call states the subscriber's total willingness at that point; it
    /// replaces the previous outstanding demand rather than adding to it.
    fn request(&self, demand: Demand);

    /// Stop the subscription. No values or completion follow. Idempotent.
    fn cancel(&self);
}

/// Receiving side of the pull protocol.
///
/// Callbacks take `&self`: a publisher may invoke them from a worker thread
/// while the subscriber is also reachable elsewhere, so implementations keep
/// their own state behind interior mutability.
pub trait Subscriber: Send + Sync + 'static {
    /// The type of value delivered by the publisher.
    type Input;

    /// Called once with the subscription handle, before any value.
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>);

    /// Called for each value. The returned demand is added to what is
    /// still outstanding.
    fn on_value(&self, input: Self::Input) -> Demand;

    /// Called at most once, after the last value.
    fn on_complete(&self);
}

/// A cold source of values that follows the pull protocol.
///
/// Every call to [`Publisher::subscribe`] creates an independent subscription.
pub trait Publisher {
    /// The type of value this publisher emits.
    type Output;

    /// Attach a subscriber and hand it a fresh subscription.
    fn subscribe<S>(&self, subscriber: Arc<S>)
    where
        S: Subscriber<Input = Self::Output>;
}
