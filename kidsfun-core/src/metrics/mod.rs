//! Activity metrics shared by every widget and the parent report.
//!
//! All producers (story adventure, story builder, imagination explorer,
//! math and drawing) record into a single [`MetricsStore`]. The report
//! reads the whole mapping back and never talks to the producers directly.

mod backend;
pub mod keys;
mod store;

pub use backend::{FileBackend, MemoryBackend, MetricsBackend};
#[cfg(test)]
pub(crate) use backend::FaultyBackend;
pub use store::{Metrics, MetricsError, MetricsStore};
