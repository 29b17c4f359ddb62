//! Step-by-step story builder.

use super::ActivityError;
use crate::metrics::{keys, MetricsStore};
use std::sync::Arc;

/// One step of the builder: a heading and four options.
#[derive(Debug)]
pub struct BuilderStep {
    pub title: &'static str,
    pub options: [&'static str; 4],
}

pub static BUILDER_STEPS: [BuilderStep; 4] = [
    BuilderStep {
        title: "Choose a hero",
        options: ["Brave Dragon", "Sparkly Unicorn", "Friendly Robot", "Curious Fairy"],
    },
    BuilderStep {
        title: "Choose a sidekick",
        options: ["Clever Fox", "Cheerful Monkey", "Daring Puppy", "Wise Owl"],
    },
    BuilderStep {
        title: "Choose a setting",
        options: ["Enchanted Forest", "Deep Space", "Coral Reef", "Crystal Castle"],
    },
    BuilderStep {
        title: "Choose a mission",
        options: [
            "Find hidden treasure",
            "Rescue a friend",
            "Solve a mystery",
            "Throw a party",
        ],
    },
];

/// Everything picked for a finished story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorySelections {
    pub hero: String,
    pub sidekick: String,
    pub setting: String,
    pub mission: String,
}

impl StorySelections {
    /// The story sentence shown when the builder finishes.
    pub fn story_text(&self) -> String {
        format!(
            "Your story: In the {}, {} and their friend {} decide to {}. What an adventure!",
            self.setting,
            self.hero,
            self.sidekick,
            self.mission.to_lowercase()
        )
    }
}

/// Walks the child through [`BUILDER_STEPS`] and counts finished stories.
pub struct StoryBuilder {
    chosen: Vec<&'static str>,
    finished: Option<StorySelections>,
    metrics: Arc<MetricsStore>,
}

impl StoryBuilder {
    pub fn new(metrics: Arc<MetricsStore>) -> Self {
        Self {
            chosen: Vec::with_capacity(BUILDER_STEPS.len()),
            finished: None,
            metrics,
        }
    }

    /// The step waiting for a choice, or `None` once finished.
    pub fn current_step(&self) -> Option<&'static BuilderStep> {
        if self.finished.is_some() {
            return None;
        }
        BUILDER_STEPS.get(self.chosen.len())
    }

    /// Zero-based number of the current step.
    pub fn step_index(&self) -> usize {
        self.chosen.len()
    }

    /// Choose an option on the current step.
    ///
    /// Returns the selections when this choice completed the story. A
    /// failure to record the `stories` metric is logged and does not
    /// stop the story from finishing.
    pub fn choose(&mut self, index: usize) -> Result<Option<StorySelections>, ActivityError> {
        let step = self.current_step().ok_or(ActivityError::Finished)?;
        let option = step
            .options
            .get(index)
            .copied()
            .ok_or(ActivityError::InvalidOption {
                index,
                available: step.options.len(),
            })?;
        self.chosen.push(option);

        if self.chosen.len() < BUILDER_STEPS.len() {
            return Ok(None);
        }

        let selections = StorySelections {
            hero: self.chosen[0].to_string(),
            sidekick: self.chosen[1].to_string(),
            setting: self.chosen[2].to_string(),
            mission: self.chosen[3].to_string(),
        };
        // The story is finished even if the counter cannot be saved
        if let Err(e) = self.metrics.increment(keys::STORIES) {
            tracing::warn!(error = %e, "failed to record finished story");
        }
        tracing::debug!(story = %selections.story_text(), "story built");
        self.finished = Some(selections.clone());
        Ok(Some(selections))
    }

    /// The finished selections, if the story is complete.
    pub fn selections(&self) -> Option<&StorySelections> {
        self.finished.as_ref()
    }

    /// Start a new story.
    pub fn reset(&mut self) {
        self.chosen.clear();
        self.finished = None;
    }
}
