//! From activities through the store to the parent report.

use kidsfun_core::activities::{Category, DrawingTimer, MathProblem, Operation};
use kidsfun_core::metrics::{keys, MemoryBackend, Metrics};
use kidsfun_core::report::suggestions;
use kidsfun_core::{MetricsStore, Report, TestHarness};
use tempfile::TempDir;

fn metrics(pairs: &[(&str, u64)]) -> Metrics {
    pairs.iter().map(|&(k, v)| (k, v)).collect()
}

#[test]
fn test_high_accuracy_suggestion() {
    let report = Report::build(&metrics(&[("mathAttempts", 10), ("mathCorrect", 9)]));
    assert_eq!(report.suggestions[0], suggestions::MATH_HIGH_ACCURACY);
}

#[test]
fn test_no_attempts_suggestion() {
    let report = Report::build(&metrics(&[("mathAttempts", 0)]));
    assert_eq!(report.suggestions[0], suggestions::MATH_NOT_STARTED);
}

#[test]
fn test_report_reflects_every_activity() {
    let mut harness = TestHarness::new().unwrap();

    harness.play(&[0, 1]).unwrap();
    for category in Category::ALL {
        harness.session.imagination_mut().select(category, 1).unwrap();
    }
    for _ in 0..4 {
        harness.session.builder_mut().choose(2).unwrap();
    }
    let problem = MathProblem::new(3, Operation::Add, 4);
    harness.session.answer_math(&problem, Some(7)).unwrap();
    harness.session.answer_math(&problem, Some(8)).unwrap();
    let mut timer = DrawingTimer::start();
    for _ in 0..120 {
        timer.record_stroke();
    }
    harness.session.finish_drawing(timer).unwrap();

    let report = harness.report();
    let value = |key: &str| report.rows.iter().find(|r| r.key == key).unwrap().value;

    assert_eq!(value(keys::STORY_DRAGON), 1);
    assert_eq!(value(keys::IMAGINATION_SELECTIONS), 1);
    assert_eq!(value(keys::STORIES), 1);
    assert_eq!(value(keys::MATH_ATTEMPTS), 2);
    assert_eq!(value(keys::MATH_CORRECT), 1);
    assert_eq!(value(keys::DRAWING_STROKES), 120);
    assert!(harness.metrics().contains(keys::DRAWING_TIME));
    assert_eq!(report.suggestions[0], suggestions::MATH_NEEDS_PRACTICE);
    assert_eq!(report.suggestions[1], suggestions::STORY_ADVENTUROUS);
    assert_eq!(report.suggestions[2], suggestions::DRAWING_LOVES);
    assert!(report.extras.is_empty());
}

#[test]
fn test_corrupt_file_reads_as_empty_and_recovers() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("kidsfun_metrics.json");
    std::fs::write(&path, "{\"stories\": 3, oops").unwrap();

    let store = MetricsStore::open(&path);
    assert!(store.load().is_empty());
    assert!(Report::build(&store.load())
        .rows
        .iter()
        .all(|r| r.value == 0));

    assert_eq!(store.increment(keys::STORIES).unwrap(), 1);
    assert_eq!(MetricsStore::open(&path).load().get(keys::STORIES), 1);
}

#[test]
fn test_unknown_keys_survive_round_trip() {
    let store = MetricsStore::new(MemoryBackend::with_blob(
        r#"{"legacyCounter": 4, "stories": 1}"#,
    ));
    store.increment(keys::STORIES).unwrap();

    let report = Report::build(&store.load());
    assert_eq!(report.extras, vec![("legacyCounter".to_string(), 4)]);
}
