//! Tracing helpers for extraction runs.
//!
//! Targets used by this crate:
//!
//! - `surface_nets` - operation summaries (INFO) and phase counts (DEBUG)
//! - `surface_nets::timing` - elapsed time per operation (INFO) and per phase (TRACE)
//!
//! Enable with e.g. `RUST_LOG=surface_nets=debug,surface_nets::timing=info`.

use std::time::Instant;
use tracing::{Span, debug, info, trace};

/// A performance timer that logs duration on drop.
///
/// ```rust,ignore
/// let _timer = OperationTimer::new("extract");
/// // ... work ...
/// // elapsed time logged here
/// ```
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    span: Span,
}

impl OperationTimer {
    /// Create a new operation timer.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("surface_nets_operation", operation = name);
        debug!(target: "surface_nets::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Create a timer tagged with the grid size.
    pub fn with_grid(name: &'static str, size: usize) -> Self {
        let span = tracing::info_span!("surface_nets_operation", operation = name, size = size);
        debug!(
            target: "surface_nets::timing",
            operation = name,
            size = size,
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Get the elapsed time.
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
            target: "surface_nets::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            "Operation completed"
        );
    }
}

/// Log a completed phase of an extraction at trace level.
pub fn log_phase(phase: &'static str, cells: usize, started: Instant) {
    trace!(
        target: "surface_nets::timing",
        phase = phase,
        cells = cells,
        elapsed_us = started.elapsed().as_micros(),
        "Phase completed"
    );
}
