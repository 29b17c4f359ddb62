//! The parent-facing summary table.

use crate::metrics::{keys, Metrics};

/// How a metric's value should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Count,
    Seconds,
}

/// A metric the report knows how to label.
#[derive(Debug, Clone, Copy)]
pub struct TrackedMetric {
    pub key: &'static str,
    pub activity: &'static str,
    pub label: &'static str,
    pub unit: Unit,
}

/// Every metric in the summary table, in display order.
pub const TRACKED_METRICS: &[TrackedMetric] = &[
    TrackedMetric {
        key: keys::MATH_ATTEMPTS,
        activity: "Math Adventure",
        label: "Problems attempted",
        unit: Unit::Count,
    },
    TrackedMetric {
        key: keys::MATH_CORRECT,
        activity: "Math Adventure",
        label: "Correct answers",
        unit: Unit::Count,
    },
    TrackedMetric {
        key: keys::STORY_DRAGON,
        activity: "Story Adventure",
        label: "Dragon choices",
        unit: Unit::Count,
    },
    TrackedMetric {
        key: keys::STORY_RIVER,
        activity: "Story Adventure",
        label: "River choices",
        unit: Unit::Count,
    },
    TrackedMetric {
        key: keys::DRAWING_STROKES,
        activity: "Drawing Studio",
        label: "Brush strokes",
        unit: Unit::Count,
    },
    TrackedMetric {
        key: keys::DRAWING_TIME,
        activity: "Drawing Studio",
        label: "Time spent drawing",
        unit: Unit::Seconds,
    },
    TrackedMetric {
        key: keys::IMAGINATION_SELECTIONS,
        activity: "Imagination Explorer",
        label: "Ideas imagined",
        unit: Unit::Count,
    },
    TrackedMetric {
        key: keys::STORIES,
        activity: "Story Builder",
        label: "Stories created",
        unit: Unit::Count,
    },
];

/// Whether the summary table has a row for this metric.
pub fn is_tracked(key: &str) -> bool {
    TRACKED_METRICS.iter().any(|m| m.key == key)
}

/// One line of the summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub activity: &'static str,
    pub metric: &'static str,
    pub key: &'static str,
    pub value: u64,
    pub unit: Unit,
}

impl ReportRow {
    /// The value as a parent would read it.
    pub fn formatted_value(&self) -> String {
        match self.unit {
            Unit::Count => self.value.to_string(),
            Unit::Seconds => format_duration(self.value),
        }
    }
}

/// One row per tracked metric, missing metrics shown as zero.
pub fn build_summary(metrics: &Metrics) -> Vec<ReportRow> {
    TRACKED_METRICS
        .iter()
        .map(|m| ReportRow {
            activity: m.activity,
            metric: m.label,
            key: m.key,
            value: metrics.get(m.key),
            unit: m.unit,
        })
        .collect()
}

fn format_duration(seconds: u64) -> String {
    let (minutes, seconds) = (seconds / 60, seconds % 60);
    if minutes == 0 {
        format!("{seconds}s")
    } else {
        format!("{minutes}m {seconds:02}s")
    }
}
