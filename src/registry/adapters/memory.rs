//! In-memory snapshot store for tests and ephemeral registries.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::registry::ports::{PersistedRegistry, SnapshotError, SnapshotResult, SnapshotStore};

/// Thread-safe in-memory registry document.
///
/// Clones share the same document, which lets a test hold a handle to the
/// "disk" while a store writes through another.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotStore {
    document: Arc<RwLock<Option<PersistedRegistry>>>,
}

impl InMemorySnapshotStore {
    /// Creates a store with nothing persisted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `document`.
    #[must_use]
    pub fn with_document(document: PersistedRegistry) -> Self {
        Self {
            document: Arc::new(RwLock::new(Some(document))),
        }
    }

    /// Returns a copy of the persisted document.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Persistence`] when lock acquisition fails.
    pub fn document(&self) -> SnapshotResult<Option<PersistedRegistry>> {
        let document = self.document.read().map_err(|err| {
            SnapshotError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(document.clone())
    }

    /// Replaces the persisted document, bypassing any service.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Persistence`] when lock acquisition fails.
    pub fn replace(&self, replacement: PersistedRegistry) -> SnapshotResult<()> {
        let mut document = self.document.write().map_err(|err| {
            SnapshotError::persistence(std::io::Error::other(err.to_string()))
        })?;
        *document = Some(replacement);
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn read(&self) -> SnapshotResult<Option<PersistedRegistry>> {
        self.document()
    }

    async fn write(&self, registry: &PersistedRegistry) -> SnapshotResult<()> {
        self.replace(registry.clone())
    }
}
