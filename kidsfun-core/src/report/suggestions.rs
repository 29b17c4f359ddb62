//! Rule-based suggestions for parents.
//!
//! Each rule looks at the metrics on its own and contributes exactly one
//! suggestion. Missing metrics read as zero, and the math rule checks for
//! zero attempts before dividing.

use crate::metrics::{keys, Metrics};

/// Correct/attempted ratio at or above which math accuracy counts as great.
pub const HIGH_ACCURACY_THRESHOLD: f64 = 0.6;

/// Strokes above which a child clearly loves drawing.
pub const LOTS_OF_STROKES: u64 = 100;

/// Drawing time, in seconds, above which a child clearly loves drawing.
pub const LOTS_OF_DRAWING_SECS: u64 = 300;

pub const MATH_NOT_STARTED: &str =
    "Try playing some math games to build confidence with numbers.";
pub const MATH_HIGH_ACCURACY: &str =
    "Great math accuracy! Introduce more challenging problems.";
pub const MATH_NEEDS_PRACTICE: &str = "Practice more addition and subtraction together.";
pub const STORY_ADVENTUROUS: &str =
    "Your child seems to prefer adventurous choices. Encourage imaginative play.";
pub const STORY_CALM: &str =
    "Your child enjoys calm and reflective choices. Offer creative storytelling time.";
pub const STORY_BOTH: &str =
    "Explore both adventurous and calm story paths to see what your child enjoys.";
pub const DRAWING_LOVES: &str =
    "Your child loves drawing! Provide diverse art materials to nurture creativity.";
pub const DRAWING_MORE: &str =
    "Encourage your child to spend more time drawing to develop fine motor skills.";

type Rule = fn(&Metrics) -> &'static str;

/// The rules, in the order their suggestions are listed.
const RULES: &[Rule] = &[math_accuracy, story_preference, drawing_interest];

/// Apply every rule in order.
pub fn build_suggestions(metrics: &Metrics) -> Vec<String> {
    RULES.iter().map(|rule| rule(metrics).to_string()).collect()
}

/// Correct answers over attempts, or `None` before any attempt.
pub fn math_accuracy_rate(metrics: &Metrics) -> Option<f64> {
    let attempts = metrics.get(keys::MATH_ATTEMPTS);
    if attempts == 0 {
        return None;
    }
    Some(metrics.get(keys::MATH_CORRECT) as f64 / attempts as f64)
}

fn math_accuracy(metrics: &Metrics) -> &'static str {
    match math_accuracy_rate(metrics) {
        None => MATH_NOT_STARTED,
        Some(rate) if rate < HIGH_ACCURACY_THRESHOLD => MATH_NEEDS_PRACTICE,
        Some(_) => MATH_HIGH_ACCURACY,
    }
}

/// Dragon picks are adventurous, river picks are calm.
fn story_preference(metrics: &Metrics) -> &'static str {
    let dragon = metrics.get(keys::STORY_DRAGON);
    let river = metrics.get(keys::STORY_RIVER);
    match dragon.cmp(&river) {
        std::cmp::Ordering::Greater => STORY_ADVENTUROUS,
        std::cmp::Ordering::Less => STORY_CALM,
        std::cmp::Ordering::Equal => STORY_BOTH,
    }
}

fn drawing_interest(metrics: &Metrics) -> &'static str {
    if metrics.get(keys::DRAWING_STROKES) > LOTS_OF_STROKES
        || metrics.get(keys::DRAWING_TIME) > LOTS_OF_DRAWING_SECS
    {
        DRAWING_LOVES
    } else {
        DRAWING_MORE
    }
}
