//! Durable local snapshots of the cart.
//!
//! The cart's serialized form lives under a single key so an anonymous cart
//! survives a crash or reload. This is a pure serialization boundary: read
//! failures degrade to an empty cart and write failures are dropped, so no
//! storage error ever reaches the UI layer.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use rouse_core::LineItem;
use thiserror::Error;

/// Durable key holding the serialized cart.
pub(crate) const CART_STORAGE_KEY: &str = "rouse_cart";

/// Errors from the underlying key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The store cannot be used at all (missing directory, quota, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous key-value byte store scoped to the local profile.
///
/// The snapshot layer treats every failure as recoverable, so implementations
/// are free to fail on quota or availability without breaking the cart.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails (e.g., quota exceeded).
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key` entirely. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// Backends
// =============================================================================

/// In-memory backend; the cart does not survive a restart.
///
/// Cloning shares the underlying map, which also makes this the backend of
/// choice for tests that want to inspect what was persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// File-per-key backend rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Create a backend storing each key as `<dir>/<key>.json`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

// =============================================================================
// SnapshotStore
// =============================================================================

/// Load/save of the cart's serialized form over a [`StorageBackend`].
///
/// Never surfaces an error: a missing or malformed snapshot loads as an
/// empty cart, and failed writes are logged and dropped.
pub struct SnapshotStore {
    backend: Box<dyn StorageBackend>,
    key: &'static str,
}

impl SnapshotStore {
    /// Create a snapshot store over `backend` using the standard cart key.
    #[must_use]
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            key: CART_STORAGE_KEY,
        }
    }

    /// Load the persisted cart; missing or malformed content loads as empty.
    #[must_use]
    pub fn load(&self) -> Vec<LineItem> {
        let raw = match self.backend.get(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(error) => {
                tracing::warn!(%error, "failed to read cart snapshot, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(error) => {
                tracing::warn!(%error, "malformed cart snapshot, starting empty");
                Vec::new()
            }
        }
    }

    /// Persist the full cart state. Best-effort: failures are dropped.
    pub fn save(&self, items: &[LineItem]) {
        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(error) => {
                tracing::debug!(%error, "failed to serialize cart snapshot");
                return;
            }
        };

        if let Err(error) = self.backend.set(self.key, &json) {
            tracing::debug!(%error, "failed to persist cart snapshot");
        }
    }

    /// Remove the durable key entirely.
    pub fn clear(&self) {
        if let Err(error) = self.backend.remove(self.key) {
            tracing::debug!(%error, "failed to clear cart snapshot");
        }
    }
}
