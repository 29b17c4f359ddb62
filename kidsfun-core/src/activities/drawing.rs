//! Time and brush strokes in the drawing studio.

use crate::metrics::{keys, MetricsError, MetricsStore};
use std::time::{Duration, Instant};

/// Measures one visit to the drawing studio.
#[derive(Debug, Clone, Copy)]
pub struct DrawingTimer {
    started: Instant,
    strokes: u64,
}

/// Running totals after a visit has been saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawingTotals {
    pub seconds: u64,
    pub strokes: u64,
}

impl DrawingTimer {
    /// Start timing now.
    pub fn start() -> Self {
        Self::started_at(Instant::now())
    }

    /// Start timing from a given instant.
    pub fn started_at(started: Instant) -> Self {
        Self {
            started,
            strokes: 0,
        }
    }

    /// Time since the timer started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Count one brush movement while the pen is down.
    pub fn record_stroke(&mut self) {
        self.record_strokes(1);
    }

    pub fn record_strokes(&mut self, count: u64) {
        self.strokes = self.strokes.saturating_add(count);
    }

    /// Strokes counted during this visit.
    pub fn strokes(&self) -> u64 {
        self.strokes
    }

    /// Stop timing. Adds the whole seconds elapsed to `drawingTime` and the
    /// visit's strokes to `drawingStrokes`.
    pub fn finish(self, store: &MetricsStore) -> Result<DrawingTotals, MetricsError> {
        let seconds = store.add_duration(keys::DRAWING_TIME, self.elapsed().as_secs())?;
        let strokes = store.add(keys::DRAWING_STROKES, self.strokes)?;
        tracing::debug!(seconds, strokes, "drawing visit saved");
        Ok(DrawingTotals { seconds, strokes })
    }
}
