//! Branching story adventure.
//!
//! A [`StoryGraph`] is hand-authored content: nodes of narrative text with
//! labelled choices leading to other nodes. It is validated once when it is
//! built, so a [`StoryEngine`] walking it never meets a dangling choice.
//!
//! ```text
//!   start ──Visit the dragon──▶ dragon ──Fly with the dragon────▶ fly (end)
//!     │                           └─────Go on a treasure hunt──▶ treasure (end)
//!     └──Explore the river──▶ river ──Sing with the fish──────▶ sing (end)
//!                               └─────Splash in the water────▶ splash (end)
//! ```

pub mod content;
mod engine;
mod graph;
mod node;

pub use engine::{StoryEngine, StoryError, StoryView};
pub use graph::{GraphError, StoryGraph};
pub use node::{Choice, NodeId, StoryNode};
