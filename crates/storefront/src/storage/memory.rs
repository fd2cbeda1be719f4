//! In-memory snapshot storage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::{SnapshotError, SnapshotStore};

/// Process-local snapshot storage.
///
/// Clones share the same entries, so a test can hand one clone to a
/// [`CartStore`](crate::cart::CartStore) and inspect another.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    inner: Arc<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemorySnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `value` under `key`.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.entries().insert(key.to_owned(), value.to_owned());
        store
    }

    /// Current value under `key`, bypassing the write counter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    /// Number of successful writes since creation.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Make subsequent writes fail with [`SnapshotError::Unavailable`].
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn read(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SnapshotError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(SnapshotError::Unavailable("writes disabled".to_string()));
        }
        self.entries().insert(key.to_owned(), value.to_owned());
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_key() {
        let store = MemorySnapshotStore::new();
        assert!(store.read("nothing").unwrap().is_none());
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemorySnapshotStore::new();
        let handle = store.clone();

        store.write("k", "v1").unwrap();
        store.write("k", "v2").unwrap();

        assert_eq!(handle.get("k").as_deref(), Some("v2"));
        assert_eq!(handle.write_count(), 2);
    }

    #[test]
    fn test_failed_writes_leave_value() {
        let store = MemorySnapshotStore::with_entry("k", "kept");
        store.fail_writes(true);

        assert!(matches!(
            store.write("k", "lost"),
            Err(SnapshotError::Unavailable(_))
        ));
        assert_eq!(store.get("k").as_deref(), Some("kept"));
        assert_eq!(store.write_count(), 0);
    }
}
