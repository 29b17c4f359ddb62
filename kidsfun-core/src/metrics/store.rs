//! The persistent metrics mapping and its load-modify-save cycle.

use super::backend::{FileBackend, MemoryBackend, MetricsBackend};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

/// Errors from writing metrics.
///
/// Reading never fails: missing or corrupt data loads as an empty mapping.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A snapshot of every metric, keyed by name.
///
/// Lookups of names that were never recorded return zero, so readers
/// can tolerate keys that appear over time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metrics(BTreeMap<String, u64>);

impl Metrics {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a metric, zero if absent.
    pub fn get(&self, name: &str) -> u64 {
        self.0.get(name).copied().unwrap_or(0)
    }

    /// Whether the metric has ever been recorded.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Iterate metrics in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of recorded metrics.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add to a metric and return its new value. Saturates instead of wrapping.
    fn add(&mut self, name: &str, amount: u64) -> u64 {
        let value = self.0.entry(name.to_string()).or_insert(0);
        *value = value.saturating_add(amount);
        *value
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for Metrics {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Durable counters and accumulators shared by every activity.
///
/// Every mutation is a full load-modify-save of the backing blob. The
/// cycle runs under a mutex, so two callers sharing one store (for
/// example through an `Arc`) cannot overwrite each other's update.
pub struct MetricsStore {
    backend: Box<dyn MetricsBackend>,
    write_lock: Mutex<()>,
}

impl MetricsStore {
    /// Create a store over any backend.
    pub fn new(backend: impl MetricsBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a store persisted to a JSON file.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::new(FileBackend::new(path.as_ref()))
    }

    /// Create a store that only lives in memory.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Load the full mapping.
    ///
    /// Returns an empty mapping when nothing is stored, when the backend
    /// cannot be read, or when the stored blob does not parse.
    pub fn load(&self) -> Metrics {
        match self.backend.read() {
            Ok(raw) => parse_blob(raw),
            Err(e) => {
                tracing::warn!(error = %e, "could not read metrics, starting empty");
                Metrics::new()
            }
        }
    }

    /// Replace the persisted mapping.
    pub fn save(&self, metrics: &Metrics) -> Result<(), MetricsError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.write(metrics)
    }

    /// Add one to a counter and return its new value.
    pub fn increment(&self, name: &str) -> Result<u64, MetricsError> {
        self.add(name, 1)
    }

    /// Add whole seconds to a duration metric and return its new value.
    pub fn add_duration(&self, name: &str, seconds: u64) -> Result<u64, MetricsError> {
        self.add(name, seconds)
    }

    /// Add any amount to a counter and return its new value.
    pub fn add(&self, name: &str, amount: u64) -> Result<u64, MetricsError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        // A failed read must not be saved back as an empty mapping
        let mut metrics = parse_blob(self.backend.read()?);
        let value = metrics.add(name, amount);
        self.write(&metrics)?;

        tracing::debug!(metric = name, amount, value, "metric updated");
        Ok(value)
    }

    fn write(&self, metrics: &Metrics) -> Result<(), MetricsError> {
        let blob = serde_json::to_string(metrics)?;
        self.backend.write(&blob)?;
        Ok(())
    }
}

/// Parse a stored blob. Missing or corrupt data is an empty mapping.
fn parse_blob(raw: Option<String>) -> Metrics {
    let Some(raw) = raw else {
        return Metrics::new();
    };
    match serde_json::from_str(&raw) {
        Ok(metrics) => metrics,
        Err(e) => {
            tracing::warn!(error = %e, "stored metrics are corrupt, starting empty");
            Metrics::new()
        }
    }
}

impl std::fmt::Debug for MetricsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::FaultyBackend;
    use crate::metrics::keys;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_load_empty_store() {
        let store = MetricsStore::in_memory();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_corrupt_blob_is_empty() {
        for garbage in ["not json", "[1, 2, 3]", "{\"stories\": -4}", "{\"stories\": \"x\"}", ""] {
            let store = MetricsStore::new(MemoryBackend::with_blob(garbage));
            assert!(store.load().is_empty(), "blob {garbage:?} should load empty");
        }
    }

    #[test]
    fn test_increment_defaults_to_zero() {
        let store = MetricsStore::in_memory();
        assert_eq!(store.increment(keys::STORIES).unwrap(), 1);
        assert_eq!(store.increment(keys::STORIES).unwrap(), 2);
        assert_eq!(store.load().get(keys::STORIES), 2);
    }

    #[test]
    fn test_increment_recovers_from_corrupt_blob() {
        let store = MetricsStore::new(MemoryBackend::with_blob("{{{"));
        assert_eq!(store.increment(keys::STORY_DRAGON).unwrap(), 1);
        assert_eq!(store.load().get(keys::STORY_DRAGON), 1);
    }

    #[test]
    fn test_add_duration_accumulates() {
        let store = MetricsStore::in_memory();
        store.add_duration(keys::DRAWING_TIME, 30).unwrap();
        store.add_duration(keys::DRAWING_TIME, 0).unwrap();
        assert_eq!(store.add_duration(keys::DRAWING_TIME, 45).unwrap(), 75);
    }

    #[test]
    fn test_accumulation_is_order_independent() {
        let forward = MetricsStore::in_memory();
        let backward = MetricsStore::in_memory();
        let amounts = [3u64, 0, 17, 1, 9];

        for a in amounts {
            forward.add_duration("time", a).unwrap();
            forward.increment("count").unwrap();
        }
        for a in amounts.iter().rev() {
            backward.increment("count").unwrap();
            backward.add_duration("time", *a).unwrap();
        }

        assert_eq!(forward.load(), backward.load());
        assert_eq!(forward.load().get("time"), amounts.iter().sum::<u64>());
        assert_eq!(forward.load().get("count"), 5);
    }

    #[test]
    fn test_add_saturates() {
        let store = MetricsStore::in_memory();
        store.add_duration("big", u64::MAX - 1).unwrap();
        assert_eq!(store.add_duration("big", 10).unwrap(), u64::MAX);
    }

    #[test]
    fn test_save_replaces_mapping() {
        let store = MetricsStore::in_memory();
        store.increment("old").unwrap();

        let replacement: Metrics = [("new", 7u64)].into_iter().collect();
        store.save(&replacement).unwrap();

        let loaded = store.load();
        assert!(!loaded.contains("old"));
        assert_eq!(loaded.get("new"), 7);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(MetricsStore::in_memory());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..25 {
                        store.increment(keys::MATH_ATTEMPTS).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.load().get(keys::MATH_ATTEMPTS), 200);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("kidsfun_metrics.json");

        MetricsStore::open(&path).increment(keys::STORIES).unwrap();
        MetricsStore::open(&path)
            .add_duration(keys::DRAWING_TIME, 12)
            .unwrap();

        let metrics = MetricsStore::open(&path).load();
        assert_eq!(metrics.get(keys::STORIES), 1);
        assert_eq!(metrics.get(keys::DRAWING_TIME), 12);
    }

    #[test]
    fn test_blob_is_flat_json_object() {
        let backend = Arc::new(MemoryBackend::new());
        let store = MetricsStore::new(Arc::clone(&backend));
        store.increment(keys::MATH_CORRECT).unwrap();

        let value: serde_json::Value = serde_json::from_str(&backend.raw().unwrap()).unwrap();
        assert_eq!(value["mathCorrect"], 1);
    }

    #[test]
    fn test_failed_read_keeps_existing_metrics() {
        let backend = Arc::new(FaultyBackend::with_blob(
            r#"{"mathAttempts":50,"stories":7}"#,
        ));
        let store = MetricsStore::new(Arc::clone(&backend));

        backend.fail_next_read();
        assert!(matches!(
            store.increment(keys::STORY_DRAGON),
            Err(MetricsError::Io(_))
        ));

        let metrics = store.load();
        assert_eq!(metrics.get(keys::MATH_ATTEMPTS), 50);
        assert_eq!(metrics.get(keys::STORIES), 7);
        assert!(!metrics.contains(keys::STORY_DRAGON));

        assert_eq!(store.increment(keys::STORY_DRAGON).unwrap(), 1);
        assert_eq!(store.load().get(keys::STORIES), 7);
    }

    #[test]
    fn test_add_counts_any_amount() {
        let store = MetricsStore::in_memory();
        store.add(keys::DRAWING_STROKES, 40).unwrap();
        assert_eq!(store.add(keys::DRAWING_STROKES, 2).unwrap(), 42);
    }
}
