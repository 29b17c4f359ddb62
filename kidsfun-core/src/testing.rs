//! Testing utilities.
//!
//! - `MockStoryTeller` for deterministic tests without API calls
//! - `TestHarness` for scripted sessions over an in-memory store

use crate::metrics::{Metrics, MetricsStore};
use crate::report::Report;
use crate::session::Session;
use crate::story::{content, GraphError, StoryError, StoryView};
use crate::storyteller::{CollaboratorError, GeneratedStory, StoryPrompt, StoryTeller};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A storyteller that returns scripted replies.
#[derive(Default)]
pub struct MockStoryTeller {
    replies: Mutex<VecDeque<Result<GeneratedStory, CollaboratorError>>>,
    prompts: Mutex<Vec<StoryPrompt>>,
}

impl MockStoryTeller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful story.
    pub fn with_story(self, text: impl Into<String>) -> Self {
        self.push(Ok(GeneratedStory {
            text: text.into(),
            image: None,
        }));
        self
    }

    /// Queue a failure.
    pub fn with_failure(self, error: CollaboratorError) -> Self {
        self.push(Err(error));
        self
    }

    /// Every prompt received so far.
    pub fn prompts(&self) -> Vec<StoryPrompt> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn push(&self, reply: Result<GeneratedStory, CollaboratorError>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }
}

#[async_trait]
impl StoryTeller for MockStoryTeller {
    async fn tell(&self, prompt: &StoryPrompt) -> Result<GeneratedStory, CollaboratorError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.clone());
        }

        let next = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        next.unwrap_or_else(|| {
            Ok(GeneratedStory {
                text: "The storyteller has no more scripted stories.".to_string(),
                image: None,
            })
        })
    }
}

/// Test harness for running scripted sessions.
pub struct TestHarness {
    /// The session under test.
    pub session: Session,
    /// The mock storyteller wired into the session.
    pub storyteller: Arc<MockStoryTeller>,
}

impl TestHarness {
    /// A session over the forest adventure with an in-memory store.
    pub fn new() -> Result<Self, GraphError> {
        Self::with_storyteller(MockStoryTeller::new())
    }

    /// Like [`new`](Self::new) with a scripted storyteller.
    pub fn with_storyteller(storyteller: MockStoryTeller) -> Result<Self, GraphError> {
        let storyteller = Arc::new(storyteller);
        let session = Session::with_parts(
            Arc::new(MetricsStore::in_memory()),
            content::forest_adventure()?,
            Some(Arc::clone(&storyteller) as Arc<dyn StoryTeller>),
        );
        Ok(Self {
            session,
            storyteller,
        })
    }

    /// Start the story and take each choice in turn.
    pub fn play(&mut self, choices: &[usize]) -> Result<StoryView, StoryError> {
        let mut view = self.session.story_mut().start();
        for &choice in choices {
            view = self.session.story_mut().choose(choice)?;
        }
        Ok(view)
    }

    /// Current value of a metric.
    pub fn metric(&self, name: &str) -> u64 {
        self.session.metrics().load().get(name)
    }

    /// Full metrics snapshot.
    pub fn metrics(&self) -> Metrics {
        self.session.metrics().load()
    }

    /// The parent report.
    pub fn report(&self) -> Report {
        self.session.report()
    }
}
