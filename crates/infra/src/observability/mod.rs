//! Observability infrastructure for logging and diagnostics
//!
//! - [`init_logging`]: installs the process-wide `tracing` subscriber
//! - [`TracingDiagnostics`]: the core diagnostic sink backed by `tracing`

pub mod logging;
pub mod tracing_sink;

pub use logging::{init_logging, LoggingError};
pub use tracing_sink::TracingDiagnostics;
