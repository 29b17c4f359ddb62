//! Story nodes and the choices that connect them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a story node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One outgoing edge of a story node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Text shown on the button.
    pub label: String,

    /// Node the choice leads to.
    pub target: NodeId,

    /// Metric incremented when the choice is taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
}

impl Choice {
    /// Create a choice with no metric.
    pub fn new(label: impl Into<String>, target: impl Into<NodeId>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
            metric: None,
        }
    }

    /// Record a metric whenever this choice is taken.
    pub fn with_metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = Some(metric.into());
        self
    }
}

/// A unit of narrative text plus its outgoing choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryNode {
    pub id: NodeId,
    pub text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl StoryNode {
    /// Create a node with no choices yet.
    pub fn new(id: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            choices: Vec::new(),
        }
    }

    /// Append a choice.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// A node without choices ends the story.
    pub fn is_terminal(&self) -> bool {
        self.choices.is_empty()
    }

    /// Labels of the choices, in order.
    pub fn choice_labels(&self) -> Vec<String> {
        self.choices.iter().map(|c| c.label.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builder() {
        let node = StoryNode::new("start", "Once upon a time")
            .with_choice(Choice::new("Left", "left").with_metric("wentLeft"))
            .with_choice(Choice::new("Right", "right"));

        assert!(!node.is_terminal());
        assert_eq!(node.choice_labels(), vec!["Left", "Right"]);
        assert_eq!(node.choices[0].metric.as_deref(), Some("wentLeft"));
        assert!(node.choices[1].metric.is_none());
    }

    #[test]
    fn test_choice_json_omits_missing_metric() {
        let json = serde_json::to_value(Choice::new("Go", "next")).unwrap();
        assert_eq!(json["target"], "next");
        assert!(json.get("metric").is_none());
    }
}
