//! Parent report built from the metrics mapping.
//!
//! The report is a pure projection of a [`Metrics`] snapshot; it is never
//! stored and building it cannot fail.

mod summary;
pub mod suggestions;

pub use suggestions::{build_suggestions, math_accuracy_rate};
pub use summary::{build_summary, is_tracked, ReportRow, TrackedMetric, Unit, TRACKED_METRICS};

use crate::metrics::{Metrics, MetricsStore};
use std::fmt::Write;
use std::sync::Arc;

/// A complete parent report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// One row per tracked metric.
    pub rows: Vec<ReportRow>,

    /// Suggestions in rule order.
    pub suggestions: Vec<String>,

    /// Recorded metrics the summary table has no row for.
    pub extras: Vec<(String, u64)>,
}

impl Report {
    /// Build a report from a metrics snapshot.
    pub fn build(metrics: &Metrics) -> Self {
        let extras = metrics
            .iter()
            .filter(|(k, _)| !is_tracked(k))
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        Self {
            rows: build_summary(metrics),
            suggestions: build_suggestions(metrics),
            extras,
        }
    }

    /// Plain-text rendering used by the headless front end and `--report`.
    pub fn render_text(&self) -> String {
        let activity_width = column_width(self.rows.iter().map(|r| r.activity), "Activity");
        let metric_width = column_width(self.rows.iter().map(|r| r.metric), "Metric");

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<activity_width$}  {:<metric_width$}  Value",
            "Activity", "Metric"
        );
        let _ = writeln!(
            out,
            "{}  {}  -----",
            "-".repeat(activity_width),
            "-".repeat(metric_width)
        );
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{:<activity_width$}  {:<metric_width$}  {}",
                row.activity,
                row.metric,
                row.formatted_value()
            );
        }

        if !self.extras.is_empty() {
            out.push_str("\nOther metrics:\n");
            for (name, value) in &self.extras {
                let _ = writeln!(out, "  {name}: {value}");
            }
        }

        out.push_str("\nSuggestions:\n");
        for suggestion in &self.suggestions {
            let _ = writeln!(out, "  * {suggestion}");
        }

        out
    }
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}

/// Reads the shared store and builds reports from it.
#[derive(Debug, Clone)]
pub struct ReportAggregator {
    metrics: Arc<MetricsStore>,
}

impl ReportAggregator {
    /// Create an aggregator over a shared store.
    pub fn new(metrics: Arc<MetricsStore>) -> Self {
        Self { metrics }
    }

    /// Load the current metrics and build a report.
    pub fn read(&self) -> Report {
        let metrics = self.metrics.load();
        tracing::info!(metrics = metrics.len(), "building parent report");
        Report::build(&metrics)
    }
}
