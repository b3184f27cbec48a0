// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the tickflow timer.
//!
//! A tick stream never fails once it is running: its only terminal signal is
//! completion. The errors in this crate describe the two places where things
//! can go wrong before that point:
//!
//! - building a timer from an invalid configuration, and
//! - the execution context refusing to start the underlying timer.
//!
//! # Examples
//!
//! ```
//! use tickflow_error::{Result, TickflowError};
//!
//! fn validate(interval_ms: u64) -> Result<()> {
//!     if interval_ms == 0 {
//!         return Err(TickflowError::invalid_configuration("interval must be non-zero"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate(0).is_err());
//! ```

/// Root error type for all tickflow operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickflowError {
    /// The timer configuration was rejected at build time
    ///
    /// Raised for a zero interval, which would make the timer spin.
    #[error("Invalid timer configuration: {message}")]
    InvalidConfiguration {
        /// What was wrong with the configuration
        message: String,
    },

    /// No async runtime was available to drive the timer
    ///
    /// The default tokio context looks up the ambient runtime when the timer
    /// starts. Starting outside of a runtime without an explicit handle fails
    /// with this variant.
    #[error("No runtime available: {context}")]
    NoRuntime {
        /// Which context tried to find a runtime
        context: String,
    },

    /// The execution context refused to start the timer
    #[error("Failed to start timer: {context}")]
    TimerStart {
        /// Details reported by the execution context
        context: String,
    },
}

impl TickflowError {
    /// Create an invalid configuration error with the given message
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a missing runtime error with the given context
    pub fn no_runtime(context: impl Into<String>) -> Self {
        Self::NoRuntime {
            context: context.into(),
        }
    }

    /// Create a timer start error with the given context
    pub fn timer_start(context: impl Into<String>) -> Self {
        Self::TimerStart {
            context: context.into(),
        }
    }

    /// Check if this error was raised while starting a timer
    ///
    /// These errors end the affected subscription without a completion.
    #[must_use]
    pub const fn is_start_failure(&self) -> bool {
        matches!(self, Self::NoRuntime { .. } | Self::TimerStart { .. })
    }
}

/// Specialized Result type for tickflow operations
///
/// ```
/// use tickflow_error::Result;
///
/// fn build() -> Result<u32> {
///     Ok(1)
/// }
/// ```
pub type Result<T> = std::result::Result<T, TickflowError>;
