//! Time utilities and abstractions
//!
//! This module provides the time handling used by task scheduling:
//! - **Clock abstractions**: Real and mock time for testing (re-exported from
//!   testing)
//! - **[`format`]**: Elapsed-time formatting for diagnostics
//! - **[`cron`]**: Cron expression normalization for the scheduling engine
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "runtime")]
//! # {
//! use std::time::Duration;
//!
//! use taskguard_common::time::{format_seconds, MockClock};
//!
//! assert_eq!(format_seconds(Duration::from_millis(3456)), "3.46");
//!
//! // Mock time for testing
//! let clock = MockClock::new();
//! clock.advance(Duration::from_secs(5));
//! # }
//! ```

pub mod cron;
pub mod format;

// Re-export commonly used items
pub use cron::{normalize as normalize_cron, CronParseError};
pub use format::format_seconds;

// Re-export Clock abstractions from testing module
#[cfg(feature = "runtime")]
pub use crate::testing::time::{Clock, MockClock, SystemClock};
