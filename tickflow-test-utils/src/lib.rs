// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for the tickflow workspace.
//!
//! - [`TestableSubscriber`] - a closure-driven subscriber that records what it
//!   receives and mirrors it to an event channel
//! - [`ManualContext`] - an execution context fired by hand, with a virtual
//!   clock and counters for created and cancelled timers
//! - [`helpers`] - async receive helpers with timeouts
//!
//! This crate is for development and testing only.

pub mod helpers;
pub mod manual_context;
pub mod testable_subscriber;

pub use manual_context::ManualContext;
pub use testable_subscriber::{SubscriberEvent, TestableSubscriber, TestableSubscriberBuilder};
