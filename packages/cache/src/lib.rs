#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Local snapshot cache for the course portal.
//!
//! The last successfully normalized [`Snapshot`] is stored under a single
//! key so the portal can render immediately on start, before the feed
//! round-trip completes. Storage is pluggable through [`CacheBackend`]:
//! [`FileBackend`] for real use, [`MemoryBackend`] for tests.
//!
//! There is no versioning, expiry, or size bound. Each save replaces the
//! previous entry.

pub mod paths;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use course_portal_catalog_models::Snapshot;

/// Key the portal stores its snapshot under unless configured otherwise.
pub const DEFAULT_CACHE_KEY: &str = "course_portal_snapshot_v1";

/// Whether `key` is usable by every backend: non-empty ASCII
/// alphanumerics, `_`, `-` and `.`, not starting with `.`.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The cache key cannot be used by this backend.
    #[error("Invalid cache key '{key}'")]
    InvalidKey {
        /// The rejected key.
        key: String,
    },
}

/// Key/value storage for cached snapshots.
pub trait CacheBackend: Send + Sync {
    /// Reads the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Removes the value stored under `key`. Removing an absent key is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at `dir`. The directory is created on the
    /// first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a backend rooted at the default cache directory.
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(paths::cache_dir())
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, CacheError> {
        if !is_valid_key(key) {
            return Err(CacheError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl CacheBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let path = self.path_for(key)?;
        paths::ensure_dir(&self.dir)?;

        // Write-then-rename: readers never observe a partial entry.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        log::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map is still a valid map.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl CacheBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// The portal's snapshot cache: one [`Snapshot`] under one key.
#[derive(Debug)]
pub struct SnapshotCache<B: CacheBackend> {
    key: String,
    backend: B,
}

impl<B: CacheBackend> SnapshotCache<B> {
    /// Creates a cache storing its snapshot under `key` in `backend`.
    #[must_use]
    pub fn new(key: &str, backend: B) -> Self {
        Self {
            key: key.to_string(),
            backend,
        }
    }

    /// The key the snapshot is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Loads the stored snapshot.
    ///
    /// Missing, unreadable, and corrupt entries are all treated as a cache
    /// miss.
    #[must_use]
    pub fn load(&self) -> Option<Snapshot> {
        let text = match self.backend.read(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => {
                log::debug!("No cached snapshot under '{}'", self.key);
                return None;
            }
            Err(e) => {
                log::warn!("Failed to read cached snapshot '{}': {e}", self.key);
                return None;
            }
        };

        match serde_json::from_str::<Snapshot>(&text) {
            Ok(snapshot) => {
                log::debug!(
                    "Loaded cached snapshot '{}' ({} modules, time={})",
                    self.key,
                    snapshot.modules.len(),
                    snapshot.time
                );
                Some(snapshot)
            }
            Err(e) => {
                log::warn!("Ignoring corrupt cached snapshot '{}': {e}", self.key);
                None
            }
        }
    }

    /// Stores `snapshot`, replacing whatever was cached before.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if serialization or the backend write fails.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), CacheError> {
        let text = serde_json::to_string(snapshot)?;
        self.backend.write(&self.key, &text)
    }

    /// Removes the cached snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend write fails.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.backend.remove(&self.key)
    }
}
