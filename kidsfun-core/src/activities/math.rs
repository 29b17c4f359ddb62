//! Math problems and scoring answers.

use super::ActivityError;
use crate::metrics::{keys, MetricsStore};
use rand::Rng;
use std::fmt;

/// Arithmetic operation of a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
}

impl Operation {
    /// Symbol shown to the child.
    pub fn symbol(self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '-',
            Operation::Multiply => '×',
        }
    }
}

/// How hard generated problems are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// The next level, wrapping back to easy.
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

/// A single arithmetic problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathProblem {
    pub left: i64,
    pub op: Operation,
    pub right: i64,
}

impl MathProblem {
    pub fn new(left: i64, op: Operation, right: i64) -> Self {
        Self { left, op, right }
    }

    /// Generate a problem for the given difficulty.
    pub fn generate(difficulty: Difficulty) -> Self {
        Self::generate_with_rng(difficulty, &mut rand::thread_rng())
    }

    /// Generate a problem using the provided random number generator.
    ///
    /// Easy problems add or subtract 1 to 6. Medium problems are mostly
    /// sums and differences up to 10 with some small products, and hard
    /// problems split evenly between sums up to 20 and products up to 10.
    /// Differences never go below zero.
    pub fn generate_with_rng<R: Rng>(difficulty: Difficulty, rng: &mut R) -> Self {
        let (plus_minus_chance, sum_range, product_range) = match difficulty {
            Difficulty::Easy => (1.0, 1..=6, 1..=6),
            Difficulty::Medium => (0.7, 0..=10, 1..=6),
            Difficulty::Hard => (0.5, 0..=20, 1..=10),
        };

        if rng.gen_bool(plus_minus_chance) {
            let a = rng.gen_range(sum_range.clone());
            let b = rng.gen_range(sum_range);
            if rng.gen_bool(0.5) {
                Self::new(a, Operation::Add, b)
            } else {
                Self::new(a.max(b), Operation::Subtract, a.min(b))
            }
        } else {
            let a = rng.gen_range(product_range.clone());
            let b = rng.gen_range(product_range);
            Self::new(a, Operation::Multiply, b)
        }
    }

    /// The correct answer, or `None` if it does not fit in an `i64`.
    pub fn answer(&self) -> Option<i64> {
        match self.op {
            Operation::Add => self.left.checked_add(self.right),
            Operation::Subtract => self.left.checked_sub(self.right),
            Operation::Multiply => self.left.checked_mul(self.right),
        }
    }
}

impl fmt::Display for MathProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} = ?", self.left, self.op.symbol(), self.right)
    }
}

/// Result of checking one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub feedback: String,
    pub score: MathScore,
}

/// The math scoreboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MathScore {
    pub attempts: u64,
    pub correct: u64,
}

impl MathScore {
    /// Read the scoreboard from the store.
    pub fn read(store: &MetricsStore) -> Self {
        let metrics = store.load();
        Self {
            attempts: metrics.get(keys::MATH_ATTEMPTS),
            correct: metrics.get(keys::MATH_CORRECT),
        }
    }
}

/// Check an answer and record the attempt.
///
/// `given` is `None` when the child's input was not a number; that still
/// counts as an attempt. A problem without an answer is rejected before
/// anything is recorded.
pub fn record_math_answer(
    store: &MetricsStore,
    problem: &MathProblem,
    given: Option<i64>,
) -> Result<AnswerOutcome, ActivityError> {
    let answer = problem.answer().ok_or(ActivityError::InvalidProblem {
        left: problem.left,
        symbol: problem.op.symbol(),
        right: problem.right,
    })?;
    let correct = given == Some(answer);

    let attempts = store.increment(keys::MATH_ATTEMPTS)?;
    let correct_total = if correct {
        store.increment(keys::MATH_CORRECT)?
    } else {
        store.load().get(keys::MATH_CORRECT)
    };

    let feedback = if correct {
        "Great job! That's correct!".to_string()
    } else {
        format!("Oops! The correct answer was {answer}. Try another!")
    };

    Ok(AnswerOutcome {
        correct,
        feedback,
        score: MathScore {
            attempts,
            correct: correct_total,
        },
    })
}
