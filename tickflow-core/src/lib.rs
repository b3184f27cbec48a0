// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core types for the tickflow pull-based timer.
//!
//! - [`Demand`] - how many more values a subscriber accepts
//! - [`Publisher`], [`Subscriber`], [`Subscription`] - the pull protocol
//! - [`CancellationToken`] - runtime-agnostic stop signal for timer tasks

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

extern crate alloc;

pub mod cancellation_token;
pub mod demand;
pub mod subscriber;

pub use self::cancellation_token::{CancellationToken, Cancelled};
pub use self::demand::Demand;
pub use self::subscriber::{Publisher, Subscriber, Subscription};
