//! Session - the primary public API for the activities.
//!
//! Wires configuration to one shared [`MetricsStore`] and hands that store
//! to every producer: the story adventure, the imagination explorer, the
//! story builder and the math/drawing recorders. Front ends drive the
//! session through explicit methods and render what comes back.

use crate::activities::{
    record_math_answer, ActivityError, AnswerOutcome, DrawingTimer, DrawingTotals,
    ImaginationPicker, MathProblem, StoryBuilder,
};
use crate::config::AppConfig;
use crate::metrics::{MetricsError, MetricsStore};
use crate::report::{Report, ReportAggregator};
use crate::story::{content, GraphError, StoryEngine, StoryError, StoryGraph};
use crate::storyteller::{
    ClaudeStoryTeller, CollaboratorError, GeneratedStory, StoryPrompt, StoryTeller,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;

/// Errors from Session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Story graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Story error: {0}")]
    Story(#[from] StoryError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("Activity error: {0}")]
    Activity(#[from] ActivityError),

    #[error("Storyteller error: {0}")]
    Collaborator(#[from] CollaboratorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One child's session across all activities.
pub struct Session {
    metrics: Arc<MetricsStore>,
    story: StoryEngine,
    imagination: ImaginationPicker,
    builder: StoryBuilder,
    reports: ReportAggregator,
    storyteller: Option<Arc<dyn StoryTeller>>,
}

impl Session {
    /// Create a session from configuration.
    ///
    /// Loads the custom story graph if one is configured, otherwise uses
    /// the forest adventure.
    pub async fn new(config: AppConfig) -> Result<Self, SessionError> {
        let metrics = Arc::new(match &config.metrics_path {
            Some(path) => MetricsStore::open(path),
            None => MetricsStore::in_memory(),
        });

        let graph = match &config.story_path {
            Some(path) => StoryGraph::from_json(&fs::read_to_string(path).await?)?,
            None => content::forest_adventure()?,
        };

        let storyteller: Option<Arc<dyn StoryTeller>> = match config.storyteller {
            Some(st) => Some(Arc::new(ClaudeStoryTeller::new(st)?)),
            None => None,
        };

        tracing::info!(
            metrics = ?config.metrics_path,
            story_nodes = graph.len(),
            storyteller = storyteller.is_some(),
            "session started"
        );

        Ok(Self::with_parts(metrics, graph, storyteller))
    }

    /// Assemble a session from ready-made parts.
    pub fn with_parts(
        metrics: Arc<MetricsStore>,
        graph: StoryGraph,
        storyteller: Option<Arc<dyn StoryTeller>>,
    ) -> Self {
        Self {
            story: StoryEngine::new(graph, Arc::clone(&metrics)),
            imagination: ImaginationPicker::new(Arc::clone(&metrics)),
            builder: StoryBuilder::new(Arc::clone(&metrics)),
            reports: ReportAggregator::new(Arc::clone(&metrics)),
            metrics,
            storyteller,
        }
    }

    /// The shared metrics store.
    pub fn metrics(&self) -> &Arc<MetricsStore> {
        &self.metrics
    }

    /// The story adventure.
    pub fn story(&self) -> &StoryEngine {
        &self.story
    }

    /// Mutable access to the story adventure.
    pub fn story_mut(&mut self) -> &mut StoryEngine {
        &mut self.story
    }

    pub fn imagination(&self) -> &ImaginationPicker {
        &self.imagination
    }

    pub fn imagination_mut(&mut self) -> &mut ImaginationPicker {
        &mut self.imagination
    }

    pub fn builder(&self) -> &StoryBuilder {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut StoryBuilder {
        &mut self.builder
    }

    /// Check a math answer and record it.
    pub fn answer_math(
        &self,
        problem: &MathProblem,
        given: Option<i64>,
    ) -> Result<AnswerOutcome, SessionError> {
        Ok(record_math_answer(&self.metrics, problem, given)?)
    }

    /// Stop a drawing timer and record its time and strokes.
    pub fn finish_drawing(&self, timer: DrawingTimer) -> Result<DrawingTotals, SessionError> {
        Ok(timer.finish(&self.metrics)?)
    }

    /// Build the parent report from the current metrics.
    pub fn report(&self) -> Report {
        self.reports.read()
    }

    /// Whether a storyteller is configured.
    pub fn has_storyteller(&self) -> bool {
        self.storyteller.is_some()
    }

    /// Ask the storyteller for a story.
    pub async fn tell_story(&self, prompt: &StoryPrompt) -> Result<GeneratedStory, CollaboratorError> {
        match &self.storyteller {
            Some(storyteller) => storyteller.tell(prompt).await,
            None => Err(CollaboratorError::NotConfigured),
        }
    }

    /// Ask the storyteller to analyze the current metrics for parents.
    pub async fn learning_insights(&self) -> Result<GeneratedStory, CollaboratorError> {
        let prompt = StoryPrompt::insights(&self.metrics.load());
        self.tell_story(&prompt).await
    }
}
