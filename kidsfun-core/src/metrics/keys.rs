//! Well-known metric names.
//!
//! These strings are the keys of the persisted blob, so they keep the
//! camelCase spelling older saves already use.

/// Math problems answered.
pub const MATH_ATTEMPTS: &str = "mathAttempts";

/// Math problems answered correctly.
pub const MATH_CORRECT: &str = "mathCorrect";

/// Seconds spent in the drawing studio.
pub const DRAWING_TIME: &str = "drawingTime";

/// Brush strokes painted in the drawing studio.
pub const DRAWING_STROKES: &str = "drawingStrokes";

/// Complete character/setting/activity picks in the imagination explorer.
pub const IMAGINATION_SELECTIONS: &str = "imaginationSelections";

/// Stories finished in the story builder.
pub const STORIES: &str = "stories";

/// Adventure choices to visit the dragon.
pub const STORY_DRAGON: &str = "storyDragon";

/// Adventure choices to explore the river.
pub const STORY_RIVER: &str = "storyRiver";
