//! Character, setting and activity picker.

use super::ActivityError;
use crate::metrics::{keys, MetricsStore};
use std::sync::Arc;

pub const CHARACTERS: &[&str] = &["Brave Knight", "Friendly Dragon", "Clever Robot", "Magical Unicorn"];
pub const SETTINGS: &[&str] = &["Candy Castle", "Underwater City", "Space Station", "Jungle Treehouse"];
pub const ACTIVITIES: &[&str] = &["bake cookies", "paint rainbows", "build sandcastles", "sing silly songs"];

/// The three things a child picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Character,
    Setting,
    Activity,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Character, Category::Setting, Category::Activity];

    /// Options offered for this category.
    pub fn options(self) -> &'static [&'static str] {
        match self {
            Category::Character => CHARACTERS,
            Category::Setting => SETTINGS,
            Category::Activity => ACTIVITIES,
        }
    }

    /// Heading shown above the options.
    pub fn title(self) -> &'static str {
        match self {
            Category::Character => "Pick a character",
            Category::Setting => "Pick a place",
            Category::Activity => "Pick something to do",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Remembers one pick per category.
///
/// Every pick made while all three categories are filled produces an
/// idea and counts towards `imaginationSelections`.
pub struct ImaginationPicker {
    picks: [Option<usize>; 3],
    metrics: Arc<MetricsStore>,
}

impl ImaginationPicker {
    pub fn new(metrics: Arc<MetricsStore>) -> Self {
        Self {
            picks: [None; 3],
            metrics,
        }
    }

    /// Pick an option, replacing any earlier pick in the same category.
    ///
    /// Returns the finished idea once all three categories are picked.
    pub fn select(
        &mut self,
        category: Category,
        index: usize,
    ) -> Result<Option<String>, ActivityError> {
        let options = category.options();
        if index >= options.len() {
            return Err(ActivityError::InvalidOption {
                index,
                available: options.len(),
            });
        }
        self.picks[category.slot()] = Some(index);

        let Some(idea) = self.idea() else {
            return Ok(None);
        };
        self.metrics.increment(keys::IMAGINATION_SELECTIONS)?;
        tracing::debug!(idea = %idea, "imagination idea completed");
        Ok(Some(idea))
    }

    /// Current pick for a category.
    pub fn selection(&self, category: Category) -> Option<&'static str> {
        self.picks[category.slot()].map(|i| category.options()[i])
    }

    /// The idea, if every category has a pick.
    pub fn idea(&self) -> Option<String> {
        let character = self.selection(Category::Character)?;
        let setting = self.selection(Category::Setting)?;
        let activity = self.selection(Category::Activity)?;
        Some(format!(
            "Imagine a {character} in a {setting} who loves to {activity}!"
        ))
    }

    /// Clear every pick.
    pub fn reset(&mut self) {
        self.picks = [None; 3];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idea_needs_all_three() {
        let store = Arc::new(MetricsStore::in_memory());
        let mut picker = ImaginationPicker::new(Arc::clone(&store));

        assert_eq!(picker.select(Category::Character, 1).unwrap(), None);
        assert_eq!(picker.select(Category::Setting, 2).unwrap(), None);
        let idea = picker.select(Category::Activity, 0).unwrap();

        assert_eq!(
            idea.as_deref(),
            Some("Imagine a Friendly Dragon in a Space Station who loves to bake cookies!")
        );
        assert_eq!(store.load().get(keys::IMAGINATION_SELECTIONS), 1);
    }

    #[test]
    fn test_changing_a_pick_counts_again() {
        let store = Arc::new(MetricsStore::in_memory());
        let mut picker = ImaginationPicker::new(Arc::clone(&store));
        for category in Category::ALL {
            picker.select(category, 0).unwrap();
        }

        let idea = picker.select(Category::Setting, 3).unwrap().unwrap();
        assert!(idea.contains("Jungle Treehouse"));
        assert_eq!(store.load().get(keys::IMAGINATION_SELECTIONS), 2);
    }

    #[test]
    fn test_invalid_option() {
        let mut picker = ImaginationPicker::new(Arc::new(MetricsStore::in_memory()));
        assert!(matches!(
            picker.select(Category::Activity, 9),
            Err(ActivityError::InvalidOption { index: 9, available: 4 })
        ));
        assert_eq!(picker.selection(Category::Activity), None);
    }

    #[test]
    fn test_reset_clears_picks() {
        let mut picker = ImaginationPicker::new(Arc::new(MetricsStore::in_memory()));
        picker.select(Category::Character, 0).unwrap();
        picker.reset();
        assert_eq!(picker.selection(Category::Character), None);
    }
}
