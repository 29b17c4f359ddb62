//! Built-in story content.

use super::graph::{GraphError, StoryGraph};
use super::node::{Choice, StoryNode};
use crate::metrics::keys;

/// Identifier of the forest adventure's first node.
pub const FOREST_START: &str = "start";

/// The magical forest adventure: seven nodes, four endings.
///
/// Only the first choice records a metric, so the report can compare
/// adventurous (dragon) and calm (river) picks.
pub fn forest_adventure() -> Result<StoryGraph, GraphError> {
    StoryGraph::new(
        FOREST_START,
        vec![
            StoryNode::new(
                "start",
                "You wake up in a magical forest. You see a friendly dragon and a \
                 sparkling river. Who will you visit first?",
            )
            .with_choice(Choice::new("Visit the dragon", "dragon").with_metric(keys::STORY_DRAGON))
            .with_choice(Choice::new("Explore the river", "river").with_metric(keys::STORY_RIVER)),
            StoryNode::new(
                "dragon",
                "The dragon smiles and offers you a ride through the sky! Do you hop on \
                 or ask for a treasure hunt instead?",
            )
            .with_choice(Choice::new("Fly with the dragon", "fly"))
            .with_choice(Choice::new("Go on a treasure hunt", "treasure")),
            StoryNode::new(
                "river",
                "At the river, a talking fish invites you to sing or splash. What do you choose?",
            )
            .with_choice(Choice::new("Sing with the fish", "sing"))
            .with_choice(Choice::new("Splash in the water", "splash")),
            StoryNode::new(
                "fly",
                "You soar above the clouds and land on a fluffy cloud with a cookie tree. \
                 Yum! The end.",
            ),
            StoryNode::new(
                "treasure",
                "You search for treasure and find a chest filled with crayons and stickers! \
                 Time to get creative. The end.",
            ),
            StoryNode::new(
                "sing",
                "You sing a silly song with the fish and dancing turtles join you. \
                 Everyone claps. The end.",
            ),
            StoryNode::new(
                "splash",
                "You splash in the sparkling river and discover colorful stones that look \
                 like jellybeans. You take some home. The end.",
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::NodeId;

    #[test]
    fn test_forest_adventure_is_valid() {
        let graph = forest_adventure().unwrap();
        assert_eq!(graph.len(), 7);
        assert_eq!(graph.start_id().as_str(), FOREST_START);
        assert!(graph
            .node(&NodeId::new("start"))
            .unwrap()
            .text
            .starts_with("You wake up in a magical forest"));
    }

    #[test]
    fn test_only_first_choices_record_metrics() {
        let graph = forest_adventure().unwrap();
        let metrics: Vec<_> = graph
            .nodes()
            .flat_map(|n| n.choices.iter())
            .filter_map(|c| c.metric.as_deref())
            .collect();
        assert_eq!(metrics, vec![keys::STORY_DRAGON, keys::STORY_RIVER]);
    }

    #[test]
    fn test_forest_adventure_is_acyclic() {
        assert_eq!(forest_adventure().unwrap().longest_path(), Some(2));
    }

    #[test]
    fn test_forest_adventure_endings() {
        let graph = forest_adventure().unwrap();
        let mut endings: Vec<_> = graph
            .nodes()
            .filter(|n| n.is_terminal())
            .map(|n| n.id.as_str())
            .collect();
        endings.sort_unstable();
        assert_eq!(endings, vec!["fly", "sing", "splash", "treasure"]);
    }
}
