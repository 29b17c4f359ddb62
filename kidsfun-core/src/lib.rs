//! Core of Kids Fun Learning Adventures.
//!
//! This crate provides:
//! - A branching story adventure over a validated story graph
//! - A persistent activity metrics store shared by every activity
//! - A parent report with rule-based suggestions
//! - The imagination explorer, story builder, math and drawing recorders
//! - An optional generative storyteller
//!
//! # Quick Start
//!
//! ```ignore
//! use kidsfun_core::{AppConfig, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = Session::new(AppConfig::from_env()).await?;
//!
//!     let view = session.story_mut().start();
//!     println!("{}", view.text);
//!
//!     let view = session.story_mut().choose(0)?;
//!     println!("{}", view.text);
//!
//!     println!("{}", session.report().render_text());
//!     Ok(())
//! }
//! ```

pub mod activities;
pub mod config;
pub mod metrics;
pub mod report;
pub mod session;
pub mod story;
pub mod storyteller;
pub mod testing;

// Primary public API
pub use config::{AppConfig, StoryTellerConfig};
pub use metrics::{Metrics, MetricsError, MetricsStore};
pub use report::{Report, ReportAggregator, ReportRow};
pub use session::{Session, SessionError};
pub use story::{StoryEngine, StoryError, StoryGraph, StoryView};
pub use storyteller::{CollaboratorError, GeneratedStory, StoryPrompt, StoryTeller};
pub use testing::{MockStoryTeller, TestHarness};
