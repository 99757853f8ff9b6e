//! Tracing helpers for pipeline stages.
//!
//! Enable output by initializing a subscriber in the application, e.g.
//! `RUST_LOG=drape_core=debug,drape_shell=debug`.

use std::time::Instant;
use tracing::{Span, debug, info};

/// A performance timer that logs duration on drop.
///
/// ```rust,ignore
/// fn fit_stage() {
///     let _timer = OperationTimer::new("fabric_offset");
///     // ... work ...
/// } // duration logged here
/// ```
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    span: Span,
}

impl OperationTimer {
    /// Create a new operation timer.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("fit_operation", operation = name);
        debug!(target: "drape::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Create a timer with mesh-size context fields.
    pub fn with_context(name: &'static str, vertex_count: usize, face_count: usize) -> Self {
        let span = tracing::info_span!(
            "fit_operation",
            operation = name,
            vertices = vertex_count,
            faces = face_count
        );
        debug!(
            target: "drape::timing",
            operation = name,
            vertices = vertex_count,
            faces = face_count,
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Get the elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Get the span for this timer.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        info!(
            target: "drape::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            "Operation completed"
        );
    }
}
