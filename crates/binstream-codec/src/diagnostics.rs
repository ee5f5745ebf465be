//! Diagnostics sink for contract violations.
//!
//! A stream reports operations attempted without the required capability
//! here before failing them. The sink is passed to each stream; there is no
//! process-wide logger.

use std::panic::Location;

/// Receives failed-assertion reports from a stream.
pub trait Diagnostics: Send + Sync {
    /// `condition` is the check that failed, `location` the caller's source
    /// position.
    fn assertion_failed(&self, condition: &str, location: &'static Location<'static>);
}

/// Reports through `tracing` at error level. Never halts execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn assertion_failed(&self, condition: &str, location: &'static Location<'static>) {
        tracing::error!(
            condition,
            file = location.file(),
            line = location.line(),
            "assertion failed"
        );
    }
}

impl<F> Diagnostics for F
where
    F: Fn(&str, &'static Location<'static>) + Send + Sync,
{
    fn assertion_failed(&self, condition: &str, location: &'static Location<'static>) {
        self(condition, location)
    }
}
