//! Diagnostic logger port.
//!
//! The pilot reports every mutation and observer registration through a
//! [`RouteLogger`]. Logging never fails the caller.

/// Sink for navigation diagnostics.
pub trait RouteLogger {
    /// Record one diagnostic line.
    fn log(&self, message: &str);
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl RouteLogger for NoopLogger {
    fn log(&self, _message: &str) {}
}

/// Emits every message as a `tracing` event at TRACE level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceLogger;

impl RouteLogger for TraceLogger {
    fn log(&self, message: &str) {
        tracing::trace!(target: "pilot_core", "{message}");
    }
}

impl<F> RouteLogger for F
where
    F: Fn(&str),
{
    fn log(&self, message: &str) {
        self(message);
    }
}
