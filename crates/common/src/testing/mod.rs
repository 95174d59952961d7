//! Testing utilities and helpers
//!
//! This module provides:
//! - **[`async_utils`]**: [`poll_until`] for waiting on background runs
//! - **[`time`]**: The [`Clock`] abstraction with real and mock
//!   implementations
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "runtime")]
//! # {
//! use taskguard_common::testing::MockClock;
//!
//! // In your tests:
//! fn test_with_mock_time() {
//!     let clock = MockClock::new();
//!     clock.advance(std::time::Duration::from_secs(5));
//!     // ... test with controlled time
//! }
//! # }
//! ```

pub mod async_utils;
pub mod time;

// Re-export commonly used items
pub use async_utils::poll_until;
pub use time::{Clock, MockClock, SystemClock};
