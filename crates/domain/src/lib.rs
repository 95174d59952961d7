//! # TaskGuard Domain
//!
//! Domain types shared by every TaskGuard crate.
//!
//! This crate contains:
//! - The top-level error type and Result definition
//! - Configuration structures with their defaults
//! - Time zone selection for schedules
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other TaskGuard crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
