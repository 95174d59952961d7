//! Diagnostic sink backed by `tracing`

use std::error::Error;

use taskguard_core::DiagnosticSink;
use tracing::{error, warn};

/// Forwards task diagnostics to the `tracing` subscriber.
///
/// Errors carry their full source chain in the `error` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl TracingDiagnostics {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticSink for TracingDiagnostics {
    fn warn(&self, message: &str) {
        warn!(target: "taskguard", "{message}");
    }

    fn error(&self, message: &str, cause: Option<&(dyn Error + 'static)>) {
        match cause {
            Some(cause) => error!(target: "taskguard", error = %error_chain(cause), "{message}"),
            None => error!(target: "taskguard", "{message}"),
        }
    }
}

/// `outer: inner: root` rendering of an error and its sources.
fn error_chain(err: &(dyn Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        rendered.push_str(": ");
        rendered.push_str(&inner.to_string());
        source = inner.source();
    }
    rendered
}
