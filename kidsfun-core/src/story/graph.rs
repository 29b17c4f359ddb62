//! Validated story graphs.

use super::node::{NodeId, StoryNode};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Errors found while building a story graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Story has no nodes")]
    Empty,

    #[error("Start node '{0}' does not exist")]
    MissingStart(NodeId),

    #[error("Node '{0}' is defined more than once")]
    DuplicateNode(NodeId),

    #[error("Choice {choice} of node '{node}' leads to unknown node '{target}'")]
    DanglingTarget {
        node: NodeId,
        choice: usize,
        target: NodeId,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A story graph whose every choice leads to an existing node.
///
/// Nodes are stored densely and choices are resolved to node indices up
/// front, so traversal never has to look anything up by name.
#[derive(Debug, Clone)]
pub struct StoryGraph {
    nodes: Vec<StoryNode>,
    index: HashMap<NodeId, usize>,
    /// Resolved target of each choice, parallel to `nodes[i].choices`.
    targets: Vec<Vec<usize>>,
    start: usize,
}

/// On-disk shape of a story graph.
#[derive(Deserialize)]
struct StoryDocument {
    start: NodeId,
    nodes: Vec<StoryNode>,
}

impl StoryGraph {
    /// Build and validate a graph.
    pub fn new(
        start: impl Into<NodeId>,
        nodes: impl IntoIterator<Item = StoryNode>,
    ) -> Result<Self, GraphError> {
        let nodes: Vec<StoryNode> = nodes.into_iter().collect();
        if nodes.is_empty() {
            return Err(GraphError::Empty);
        }

        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), i).is_some() {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }

        let start = start.into();
        let start = *index
            .get(&start)
            .ok_or_else(|| GraphError::MissingStart(start.clone()))?;

        let mut targets = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let mut resolved = Vec::with_capacity(node.choices.len());
            for (choice, c) in node.choices.iter().enumerate() {
                let target = index
                    .get(&c.target)
                    .copied()
                    .ok_or_else(|| GraphError::DanglingTarget {
                        node: node.id.clone(),
                        choice,
                        target: c.target.clone(),
                    })?;
                resolved.push(target);
            }
            targets.push(resolved);
        }

        Ok(Self {
            nodes,
            index,
            targets,
            start,
        })
    }

    /// Load a graph from a JSON document of the form
    /// `{ "start": "...", "nodes": [ { "id", "text", "choices": [...] } ] }`.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let doc: StoryDocument = serde_json::from_str(json)?;
        Self::new(doc.start, doc.nodes)
    }

    /// Identifier of the start node.
    pub fn start_id(&self) -> &NodeId {
        &self.nodes[self.start].id
    }

    /// Look up a node by identifier.
    pub fn node(&self, id: &NodeId) -> Option<&StoryNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// All nodes in definition order.
    pub fn nodes(&self) -> impl Iterator<Item = &StoryNode> {
        self.nodes.iter()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a validated graph.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges on the longest path from the start node to an ending,
    /// or `None` if a cycle is reachable from the start.
    pub fn longest_path(&self) -> Option<usize> {
        let mut memo: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut on_stack = vec![false; self.nodes.len()];
        self.longest_from(self.start, &mut memo, &mut on_stack)
    }

    fn longest_from(
        &self,
        node: usize,
        memo: &mut [Option<usize>],
        on_stack: &mut [bool],
    ) -> Option<usize> {
        if let Some(depth) = memo[node] {
            return Some(depth);
        }
        if on_stack[node] {
            return None;
        }

        on_stack[node] = true;
        let mut depth = 0;
        for &next in &self.targets[node] {
            depth = depth.max(self.longest_from(next, memo, on_stack)? + 1);
        }
        on_stack[node] = false;

        memo[node] = Some(depth);
        Some(depth)
    }

    pub(crate) fn start_index(&self) -> usize {
        self.start
    }

    pub(crate) fn node_at(&self, index: usize) -> &StoryNode {
        &self.nodes[index]
    }

    pub(crate) fn target_of(&self, node: usize, choice: usize) -> Option<usize> {
        self.targets[node].get(choice).copied()
    }
}
