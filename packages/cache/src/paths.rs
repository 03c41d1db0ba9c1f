#![allow(clippy::module_name_repetitions)]
//! Canonical file paths for the portal's local data directory.
//!
//! All paths are relative to the workspace root's `data/` directory unless
//! the caller supplies its own directory.

use std::path::{Path, PathBuf};

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`; falls back to the
/// current directory when the crate is built outside the workspace layout.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Returns the `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// Returns the `cache/` directory under `data_dir`.
#[must_use]
pub fn cache_dir_in(data_dir: &Path) -> PathBuf {
    data_dir.join("cache")
}

/// Returns the default `data/cache/` directory for snapshot files.
#[must_use]
pub fn cache_dir() -> PathBuf {
    cache_dir_in(&data_dir())
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_dir_is_under_data_dir() {
        assert!(cache_dir().starts_with(data_dir()));
        assert_eq!(cache_dir_in(Path::new("/tmp/x")), PathBuf::from("/tmp/x/cache"));
    }

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();
    }
}
