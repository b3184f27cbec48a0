// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_channel::{Receiver, Sender};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tickflow_core::{Demand, Subscriber, Subscription};

type SubscriptionHook = Box<dyn Fn(&Arc<dyn Subscription>) + Send + Sync>;
type InputHook<T> = Box<dyn Fn(&T) -> Demand + Send + Sync>;
type CompletionHook = Box<dyn Fn() + Send + Sync>;

/// Everything a [`TestableSubscriber`] observed, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriberEvent<T> {
    Subscribed,
    Value(T),
    Completed,
}

impl<T> SubscriberEvent<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// A subscriber driven by closures that records everything it receives.
///
/// Defaults: request `max(1)` on subscribe, grant `max(1)` per value, do
/// nothing on completion. Every callback is also forwarded to an event
/// channel so async tests can await it.
///
/// ```
/// use tickflow_core::Demand;
/// use tickflow_test_utils::TestableSubscriber;
///
/// let (subscriber, events) = TestableSubscriber::<u32>::builder()
///     .on_subscribe(|subscription| subscription.request(Demand::max(5)))
///     .on_value(|_| Demand::none())
///     .build();
///
/// assert_eq!(subscriber.value_count(), 0);
/// assert!(events.is_empty());
/// ```
pub struct TestableSubscriber<T> {
    subscription_hook: SubscriptionHook,
    input_hook: InputHook<T>,
    completion_hook: CompletionHook,
    subscription: Mutex<Option<Arc<dyn Subscription>>>,
    values: Mutex<Vec<T>>,
    completions: AtomicUsize,
    events: Sender<SubscriberEvent<T>>,
}

impl<T> TestableSubscriber<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn builder() -> TestableSubscriberBuilder<T> {
        TestableSubscriberBuilder::default()
    }

    /// A subscriber with the default hooks.
    pub fn new() -> (Arc<Self>, Receiver<SubscriberEvent<T>>) {
        Self::builder().build()
    }

    /// The subscription handed over in `on_subscribe`, if any.
    pub fn subscription(&self) -> Option<Arc<dyn Subscription>> {
        self.subscription.lock().clone()
    }

    pub fn values(&self) -> Vec<T> {
        self.values.lock().clone()
    }

    pub fn value_count(&self) -> usize {
        self.values.lock().len()
    }

    pub fn completion_count(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }

    pub fn is_completed(&self) -> bool {
        self.completion_count() > 0
    }
}

impl<T> Subscriber for TestableSubscriber<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Input = T;

    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.subscription.lock() = Some(subscription.clone());
        let _ = self.events.try_send(SubscriberEvent::Subscribed);
        (self.subscription_hook)(&subscription);
    }

    fn on_value(&self, input: T) -> Demand {
        self.values.lock().push(input.clone());
        let demand = (self.input_hook)(&input);
        let _ = self.events.try_send(SubscriberEvent::Value(input));
        demand
    }

    fn on_complete(&self) {
        self.completions.fetch_add(1, Ordering::SeqCst);
        let _ = self.events.try_send(SubscriberEvent::Completed);
        (self.completion_hook)();
    }
}

impl<T> fmt::Debug for TestableSubscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestableSubscriber")
            .field("values", &self.values.lock().len())
            .field("completions", &self.completions.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Builder for [`TestableSubscriber`].
pub struct TestableSubscriberBuilder<T> {
    subscription_hook: SubscriptionHook,
    input_hook: InputHook<T>,
    completion_hook: CompletionHook,
}

impl<T> Default for TestableSubscriberBuilder<T> {
    fn default() -> Self {
        Self {
            subscription_hook: Box::new(|subscription| subscription.request(Demand::max(1))),
            input_hook: Box::new(|_| Demand::max(1)),
            completion_hook: Box::new(|| {}),
        }
    }
}

impl<T> TestableSubscriberBuilder<T>
where
    T: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn on_subscribe(
        mut self,
        hook: impl Fn(&Arc<dyn Subscription>) + Send + Sync + 'static,
    ) -> Self {
        self.subscription_hook = Box::new(hook);
        self
    }

    #[must_use]
    pub fn on_value(mut self, hook: impl Fn(&T) -> Demand + Send + Sync + 'static) -> Self {
        self.input_hook = Box::new(hook);
        self
    }

    #[must_use]
    pub fn on_complete(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.completion_hook = Box::new(hook);
        self
    }

    pub fn build(self) -> (Arc<TestableSubscriber<T>>, Receiver<SubscriberEvent<T>>) {
        let (tx, rx) = async_channel::unbounded();
        let subscriber = Arc::new(TestableSubscriber {
            subscription_hook: self.subscription_hook,
            input_hook: self.input_hook,
            completion_hook: self.completion_hook,
            subscription: Mutex::new(None),
            values: Mutex::new(Vec::new()),
            completions: AtomicUsize::new(0),
            events: tx,
        });
        (subscriber, rx)
    }
}
