//! Story adventure flows over the built-in forest and generated graphs.

use kidsfun_core::metrics::keys;
use kidsfun_core::story::{content, Choice, StoryEngine, StoryGraph, StoryNode};
use kidsfun_core::{MetricsStore, StoryError, TestHarness};
use std::sync::Arc;

fn engine_over(graph: StoryGraph) -> (StoryEngine, Arc<MetricsStore>) {
    let metrics = Arc::new(MetricsStore::in_memory());
    (StoryEngine::new(graph, Arc::clone(&metrics)), metrics)
}

/// A chain `n0 -> n1 -> ... -> n{len-1}` where every node also offers a
/// shortcut straight to the last node.
fn chain(len: usize) -> StoryGraph {
    let nodes = (0..len).map(|i| {
        let mut node = StoryNode::new(format!("n{i}"), format!("Node {i}"));
        if i + 1 < len {
            node = node
                .with_choice(Choice::new("next", format!("n{}", i + 1)).with_metric("steps"))
                .with_choice(Choice::new("skip", format!("n{}", len - 1)));
        }
        node
    });
    StoryGraph::new("n0", nodes).unwrap()
}

#[test]
fn test_dragon_flight_scenario() {
    let (mut engine, metrics) = engine_over(content::forest_adventure().unwrap());

    let view = engine.start();
    assert_eq!(view.node.as_str(), "start");
    assert!(view.text.starts_with("You wake up in a magical forest"));
    assert_eq!(view.choices[0], "Visit the dragon");

    let view = engine.choose(0).unwrap();
    assert_eq!(view.node.as_str(), "dragon");
    assert_eq!(metrics.load().get(keys::STORY_DRAGON), 1);
    assert_eq!(view.choices[0], "Fly with the dragon");

    let view = engine.choose(0).unwrap();
    assert_eq!(view.node.as_str(), "fly");
    assert!(view.choices.is_empty());
    assert!(engine.is_finished());
}

#[test]
fn test_always_first_choice_terminates_within_longest_path() {
    for graph in [content::forest_adventure().unwrap(), chain(1), chain(2), chain(9)] {
        let bound = graph.longest_path().expect("acyclic");
        let (mut engine, _) = engine_over(graph);

        let mut view = engine.start();
        let mut taken = 0;
        while !view.is_ending() {
            view = engine.choose(0).unwrap();
            taken += 1;
            assert!(taken <= bound, "walked {taken} steps, longest path is {bound}");
        }
        assert_eq!(engine.steps(), taken);
    }
}

#[test]
fn test_terminal_node_rejects_every_index() {
    let (mut engine, metrics) = engine_over(chain(3));
    engine.start();
    engine.choose(1).unwrap();
    assert!(engine.is_finished());
    let before = metrics.load();

    for index in [0, 1, 2, usize::MAX] {
        assert!(matches!(
            engine.choose(index),
            Err(StoryError::InvalidChoice { available: 0, .. })
        ));
        assert_eq!(engine.current_id().as_str(), "n2");
    }
    assert_eq!(metrics.load(), before);
}

#[test]
fn test_restart_from_anywhere() {
    let graph = content::forest_adventure().unwrap();
    let paths: [&[usize]; 5] = [&[], &[0], &[0, 1], &[1], &[1, 0]];

    for path in paths {
        let (mut engine, _) = engine_over(graph.clone());
        engine.start();
        for &choice in path {
            engine.choose(choice).unwrap();
        }

        let view = engine.restart();
        assert_eq!(view.node, *graph.start_id());
        assert_eq!(engine.current_id(), graph.start_id());
        assert_eq!(engine.steps(), 0);
    }
}

#[test]
fn test_one_increment_per_metric_edge() {
    let mut harness = TestHarness::new().unwrap();

    // Only the first choice carries a metric
    harness.play(&[1, 0]).unwrap();
    assert_eq!(harness.metric(keys::STORY_RIVER), 1);
    assert_eq!(harness.metric(keys::STORY_DRAGON), 0);

    harness.play(&[0, 1]).unwrap();
    assert_eq!(harness.metric(keys::STORY_DRAGON), 1);
    assert_eq!(harness.metric(keys::STORY_RIVER), 1);
    assert_eq!(harness.metrics().len(), 2);
}

#[test]
fn test_shared_store_across_engines() {
    let metrics = Arc::new(MetricsStore::in_memory());
    let mut first = StoryEngine::new(chain(4), Arc::clone(&metrics));
    let mut second = StoryEngine::new(chain(4), Arc::clone(&metrics));

    first.start();
    second.start();
    first.choose(0).unwrap();
    second.choose(0).unwrap();
    first.choose(0).unwrap();

    assert_eq!(metrics.load().get("steps"), 3);
}
