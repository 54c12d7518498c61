//! Whole-registry snapshot persistence port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Result type for snapshot store operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// One agent entry as written to storage.
///
/// Fields are kept raw (strings, sealed secrets) so an entry that cannot be
/// turned back into a domain record can still be carried through a save
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedAgent {
    /// Agent identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Kind label.
    pub kind: String,
    /// Details with secret fields sealed.
    #[serde(default)]
    pub details: BTreeMap<String, String>,
    /// Creation timestamp; absent in documents imported from older formats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Latest update timestamp; absent in documents imported from older
    /// formats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The complete persisted registry document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRegistry {
    /// Document format version.
    pub format_version: u32,
    /// Monotonic revision, incremented by every successful save.
    pub revision: u64,
    /// Agents in registration order.
    pub agents: Vec<PersistedAgent>,
}

impl PersistedRegistry {
    /// Format version written by this crate.
    pub const CURRENT_FORMAT: u32 = 1;

    /// Creates a document at `revision` holding `agents`.
    #[must_use]
    pub const fn new(revision: u64, agents: Vec<PersistedAgent>) -> Self {
        Self {
            format_version: Self::CURRENT_FORMAT,
            revision,
            agents,
        }
    }
}

/// Durable storage for the whole registry document.
///
/// `write` must replace the document atomically: a concurrent or subsequent
/// `read` observes either the previous document or the new one, never a
/// partial write.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Reads the persisted document.
    ///
    /// Returns `None` when nothing has been persisted yet.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Corrupt`] when the stored document cannot be
    /// parsed, or [`SnapshotError::Persistence`] on storage failure.
    async fn read(&self) -> SnapshotResult<Option<PersistedRegistry>>;

    /// Replaces the persisted document.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Persistence`] on storage failure.
    async fn write(&self, registry: &PersistedRegistry) -> SnapshotResult<()>;
}

/// Errors returned by snapshot store implementations.
#[derive(Debug, Clone, Error)]
pub enum SnapshotError {
    /// The stored document could not be parsed.
    #[error("registry document is corrupt: {0}")]
    Corrupt(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SnapshotError {
    /// Wraps a parse or data-quality error from the stored document.
    pub fn corrupt(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Corrupt(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
