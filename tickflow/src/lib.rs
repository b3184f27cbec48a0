// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Tickflow
//!
//! A demand-driven periodic timer: a cold, lazily started source of
//! timestamps that fires on a fixed interval and follows a pull-based
//! backpressure protocol.
//!
//! ## Overview
//!
//! A subscriber states how many ticks it is willing to receive with
//! [`Subscription::request`]. The timer emits at most that many, lets the
//! subscriber grant more through the return value of every
//! [`Subscriber::on_value`], and completes when either the configured
//! repetition count is reached or the subscriber stops granting demand.
//!
//! - [`TimerSource`] - the cold publisher, built with [`TimerSource::builder`]
//! - [`TimerSubscription`] - the per-subscriber engine
//! - [`TickStream`] - a `futures::Stream` view of a timer
//! - [`Demand`], [`Subscriber`], [`Subscription`], [`Publisher`] - the protocol
//!
//! The timer's callback runs on a worker of an
//! [`ExecutionContext`](tickflow_runtime::ExecutionContext) (tokio by
//! default), possibly in parallel with calls to `request` and `cancel`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//! use tickflow::{Demand, Publisher, Subscriber, Subscription, TimerSource};
//! use tokio::time::Instant;
//!
//! #[derive(Default)]
//! struct Printer {
//!     // Holding the subscription keeps the timer alive
//!     subscription: Mutex<Option<Arc<dyn Subscription>>>,
//! }
//!
//! impl Subscriber for Printer {
//!     type Input = Instant;
//!
//!     fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
//!         subscription.request(Demand::max(1));
//!         *self.subscription.lock().unwrap() = Some(subscription);
//!     }
//!
//!     fn on_value(&self, input: Instant) -> Demand {
//!         println!("tick at {input:?}");
//!         Demand::max(1)
//!     }
//!
//!     fn on_complete(&self) {
//!         println!("done");
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let source = TimerSource::builder(Duration::from_secs(1))
//!     .repeat_times(Demand::max(5))
//!     .build()?;
//! source.subscribe(Arc::new(Printer::default()));
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod logging;

mod configuration;
pub mod tick_stream;
mod timer_source;
pub mod timer_subscription;

pub use configuration::{TimerConfiguration, TimerSourceBuilder};
pub use tick_stream::TickStream;
pub use timer_source::TimerSource;
pub use timer_subscription::{SubscriptionPhase, TimerSubscription};

pub use tickflow_core::{Demand, Publisher, Subscriber, Subscription};
pub use tickflow_error::{Result, TickflowError};
pub use tickflow_runtime::{ExecutionContext, Schedule};

#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub use tickflow_runtime::DefaultContext;

/// A timer on the default execution context with zero leeway and no
/// repetition limit.
///
/// # Errors
///
/// Returns `TickflowError::InvalidConfiguration` if `interval` is zero.
#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub fn timer(interval: core::time::Duration) -> Result<TimerSource<DefaultContext>> {
    TimerSource::builder(interval).build()
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Demand, Publisher, Subscriber, Subscription, TickStream, TimerSource};
}
