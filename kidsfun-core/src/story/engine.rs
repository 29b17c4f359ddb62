//! Walking a story graph in response to the reader's choices.

use super::graph::StoryGraph;
use super::node::{NodeId, StoryNode};
use crate::metrics::MetricsStore;
use std::sync::Arc;
use thiserror::Error;

/// Errors from story traversal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoryError {
    #[error("Choice {index} is not available at '{node}' ({available} choices)")]
    InvalidChoice {
        node: NodeId,
        index: usize,
        available: usize,
    },
}

/// What the reader should see: the current text and the choices on offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryView {
    pub node: NodeId,
    pub text: String,
    /// Choice labels in order. Empty at an ending.
    pub choices: Vec<String>,
}

impl StoryView {
    fn of(node: &StoryNode) -> Self {
        Self {
            node: node.id.clone(),
            text: node.text.clone(),
            choices: node.choice_labels(),
        }
    }

    /// Whether this view is an ending.
    pub fn is_ending(&self) -> bool {
        self.choices.is_empty()
    }
}

/// Cursor over a [`StoryGraph`].
///
/// The engine only moves forward along choices; [`restart`](Self::restart)
/// is the only way back to the beginning. Choices that carry a metric
/// increment it in the shared [`MetricsStore`].
pub struct StoryEngine {
    graph: Arc<StoryGraph>,
    metrics: Arc<MetricsStore>,
    current: usize,
    steps: usize,
}

impl StoryEngine {
    /// Create an engine positioned at the graph's start node.
    pub fn new(graph: impl Into<Arc<StoryGraph>>, metrics: Arc<MetricsStore>) -> Self {
        let graph = graph.into();
        let current = graph.start_index();
        Self {
            graph,
            metrics,
            current,
            steps: 0,
        }
    }

    /// Move to the start node and show it.
    pub fn start(&mut self) -> StoryView {
        self.current = self.graph.start_index();
        self.steps = 0;
        tracing::debug!(node = %self.current_id(), "story started");
        self.current()
    }

    /// Take the choice at `index` from the current node.
    ///
    /// Fails without moving if the index is out of range, which includes
    /// every index at an ending.
    pub fn choose(&mut self, index: usize) -> Result<StoryView, StoryError> {
        let node = self.graph.node_at(self.current);
        let target = self
            .graph
            .target_of(self.current, index)
            .ok_or_else(|| StoryError::InvalidChoice {
                node: node.id.clone(),
                index,
                available: node.choices.len(),
            })?;

        let choice = &node.choices[index];
        if let Some(metric) = &choice.metric {
            // A failed write must not strand the reader mid-story
            if let Err(e) = self.metrics.increment(metric) {
                tracing::warn!(metric = %metric, error = %e, "failed to record story metric");
            }
        }

        tracing::debug!(
            from = %node.id,
            to = %self.graph.node_at(target).id,
            choice = %choice.label,
            "story transition"
        );

        self.current = target;
        self.steps += 1;
        Ok(self.current())
    }

    /// Return to the start node. Always succeeds.
    pub fn restart(&mut self) -> StoryView {
        tracing::info!(steps = self.steps, "story restarted");
        self.start()
    }

    /// The current view, without moving.
    pub fn current(&self) -> StoryView {
        StoryView::of(self.graph.node_at(self.current))
    }

    /// Identifier of the current node.
    pub fn current_id(&self) -> &NodeId {
        &self.graph.node_at(self.current).id
    }

    /// Whether the cursor is at an ending.
    pub fn is_finished(&self) -> bool {
        self.graph.node_at(self.current).is_terminal()
    }

    /// Choices taken since the last start or restart.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The graph being walked.
    pub fn graph(&self) -> &StoryGraph {
        &self.graph
    }
}
