// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The subscription engine that turns timer firings into demand-bounded values.
//!
//! ## Protocol
//!
//! - **request(n)**: if the repetition count is already zero, complete at
//!   once and never start a timer. Otherwise replace the outstanding demand
//!   with `n` and, the first time `n` is positive, start the timer.
//! - **firing**: if alive and demand is positive, decrement demand and the
//!   repetition count, emit the current time, add whatever demand the
//!   subscriber returns, and complete if either counter reached zero.
//! - **cancel**: stop the timer and release the subscriber. Idempotent.
//!
//! Completion is delivered at most once. Running out of demand before the
//! repetition count is reached completes the subscription rather than
//! pausing it.

mod implementation;
mod state;

pub use implementation::TimerSubscription;
pub use state::SubscriptionPhase;
