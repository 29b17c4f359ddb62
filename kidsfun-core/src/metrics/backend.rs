//! Where the serialized metrics blob lives.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Raw storage for the metrics blob.
///
/// A backend only moves one opaque string in and out; parsing and
/// validation belong to [`MetricsStore`](super::MetricsStore).
pub trait MetricsBackend: Send + Sync {
    /// Read the stored blob, or `None` if nothing has been stored yet.
    fn read(&self) -> io::Result<Option<String>>;

    /// Replace the stored blob.
    fn write(&self, blob: &str) -> io::Result<()>;
}

impl<T: MetricsBackend + ?Sized> MetricsBackend for Arc<T> {
    fn read(&self) -> io::Result<Option<String>> {
        (**self).read()
    }

    fn write(&self, blob: &str) -> io::Result<()> {
        (**self).write(blob)
    }
}

/// Stores the blob in a single JSON file.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Create a backend for the given file. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the metrics file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "metrics".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl MetricsBackend for FileBackend {
    fn read(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, blob: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write beside the target and rename so readers never see half a blob
        let temp = self.temp_path();
        fs::write(&temp, blob)?;
        fs::rename(&temp, &self.path)
    }
}

/// Keeps the blob in memory. Used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    blob: Mutex<Option<String>>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-seeded with a raw blob (which may be garbage).
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }

    /// The raw blob currently held.
    pub fn raw(&self) -> Option<String> {
        self.blob.lock().map(|b| b.clone()).unwrap_or_default()
    }
}

impl MetricsBackend for MemoryBackend {
    fn read(&self) -> io::Result<Option<String>> {
        self.blob
            .lock()
            .map(|b| b.clone())
            .map_err(|_| io::Error::other("metrics memory backend poisoned"))
    }

    fn write(&self, blob: &str) -> io::Result<()> {
        let mut guard = self
            .blob
            .lock()
            .map_err(|_| io::Error::other("metrics memory backend poisoned"))?;
        *guard = Some(blob.to_string());
        Ok(())
    }
}

/// Memory backend that fails reads or writes on demand.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FaultyBackend {
    inner: MemoryBackend,
    fail_reads: std::sync::atomic::AtomicUsize,
    fail_writes: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl FaultyBackend {
    pub(crate) fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            inner: MemoryBackend::with_blob(blob),
            ..Self::default()
        }
    }

    /// Fail the next read with an I/O error.
    pub(crate) fn fail_next_read(&self) {
        self.fail_reads
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }

    /// Fail every write from now on.
    pub(crate) fn fail_writes(&self) {
        self.fail_writes
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl MetricsBackend for FaultyBackend {
    fn read(&self) -> io::Result<Option<String>> {
        use std::sync::atomic::Ordering;
        let pending = self
            .fail_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if pending.is_ok() {
            return Err(io::Error::other("disk busy"));
        }
        self.inner.read()
    }

    fn write(&self, blob: &str) -> io::Result<()> {
        if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(io::Error::other("disk full"));
        }
        self.inner.write(blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_backend_missing_file_reads_none() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let backend = FileBackend::new(dir.path().join("absent.json"));
        assert!(backend.read().unwrap().is_none());
    }

    #[test]
    fn test_file_backend_write_then_read() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let backend = FileBackend::new(dir.path().join("nested").join("metrics.json"));

        backend.write("{\"stories\":2}").unwrap();

        assert_eq!(backend.read().unwrap().as_deref(), Some("{\"stories\":2}"));
        // Temp file is renamed away
        assert!(!dir.path().join("nested").join("metrics.json.tmp").exists());
    }

    #[test]
    fn test_memory_backend_round_trip() {
        let backend = MemoryBackend::new();
        assert!(backend.read().unwrap().is_none());

        backend.write("{}").unwrap();
        assert_eq!(backend.raw().as_deref(), Some("{}"));
    }
}
