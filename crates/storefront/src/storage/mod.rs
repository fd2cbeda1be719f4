//! Durable key/value storage for client-side snapshots.
//!
//! Modelled on browser local storage: string values under string keys, one
//! writer per key. The cart store keeps its snapshot under
//! [`CART_STORAGE_KEY`].
//!
//! # Adapters
//!
//! - [`MemorySnapshotStore`] - process-local, cloneable handle for tests
//! - [`FileSnapshotStore`] - one JSON file per key in a data directory

mod file;
mod memory;

use std::path::PathBuf;

pub use file::FileSnapshotStore;
pub use memory::MemorySnapshotStore;

use thiserror::Error;

/// Key the cart snapshot is stored under.
pub const CART_STORAGE_KEY: &str = "catzo-cart";

/// Errors raised by a [`SnapshotStore`].
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Filesystem operation failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Key cannot be mapped onto the backing store.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Backend refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// String snapshots addressed by key.
///
/// `read` returns `Ok(None)` when nothing has been written under `key`.
/// `write` replaces any previous value.
pub trait SnapshotStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, SnapshotError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn write(&self, key: &str, value: &str) -> Result<(), SnapshotError>;
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for &T {
    fn read(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SnapshotError> {
        (**self).write(key, value)
    }
}
