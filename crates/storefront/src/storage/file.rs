//! File-backed snapshot storage.
//!
//! Each key maps to `<dir>/<key>.json`. Writes go to a sibling temp file
//! which is synced and then renamed over the target, so a crash mid-write
//! leaves either the old snapshot or the new one.

use std::io::Write;
use std::path::{Path, PathBuf};

use super::{SnapshotError, SnapshotStore};

/// Snapshot storage rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::InvalidKey`] unless the key is non-empty
    /// ASCII alphanumerics, `-`, or `_`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, SnapshotError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(SnapshotError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SnapshotError + '_ {
    move |source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn read(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SnapshotError> {
        let path = self.path_for(key)?;

        std::fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;

        let temp_path = path.with_extension("json.tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io_error(&temp_path))?;
        file.write_all(value.as_bytes())
            .map_err(io_error(&temp_path))?;
        file.sync_all().map_err(io_error(&temp_path))?;
        drop(file);

        std::fs::rename(&temp_path, &path).map_err(io_error(&path))?;

        tracing::debug!(path = %path.display(), bytes = value.len(), "Snapshot written");
        Ok(())
    }
}
