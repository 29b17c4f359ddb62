//! The site's other activities, reduced to the metrics they produce.
//!
//! The drawing canvas lives with the front end; what stays here is the
//! state each activity keeps and what it records.

mod builder;
mod drawing;
mod imagination;
mod math;

pub use builder::{BuilderStep, StoryBuilder, StorySelections, BUILDER_STEPS};
pub use drawing::{DrawingTimer, DrawingTotals};
pub use imagination::{Category, ImaginationPicker, ACTIVITIES, CHARACTERS, SETTINGS};
pub use math::{
    record_math_answer, AnswerOutcome, Difficulty, MathProblem, MathScore, Operation,
};

use crate::metrics::MetricsError;
use thiserror::Error;

/// Errors from the activity widgets.
#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("Option {index} is not available ({available} options)")]
    InvalidOption { index: usize, available: usize },

    #[error("{left} {symbol} {right} is not a valid problem")]
    InvalidProblem { left: i64, symbol: char, right: i64 },

    #[error("The story is already finished")]
    Finished,

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),
}
