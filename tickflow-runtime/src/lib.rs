// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Execution contexts for the tickflow timer.
//!
//! An [`ExecutionContext`](context::ExecutionContext) runs a repeating
//! callback on its own workers and reports the current time. Select the
//! runtime through features:
//!
//! - `runtime-tokio` (default) - [`TokioContext`](impls::tokio::TokioContext)
//! - `runtime-smol` - [`SmolContext`](impls::smol::SmolContext)

pub mod context;
pub mod impls;

pub use context::{ExecutionContext, Schedule, TickHandler, TimerHandle};

#[cfg(feature = "runtime-tokio")]
pub type DefaultContext = impls::tokio::TokioContext;

#[cfg(all(feature = "runtime-smol", not(feature = "runtime-tokio")))]
pub type DefaultContext = impls::smol::SmolContext;
