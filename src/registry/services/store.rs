//! Durable agent store with sealed secret details.
//!
//! [`AgentStore`] turns the raw [`PersistedRegistry`] document into a
//! [`RegistrySnapshot`] of plaintext records and back. Every mutation runs
//! load, modify, save inside one critical section.

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tokio::sync::Mutex;

use super::snapshot::{RecordLoadError, RecordLoadFailure, RegistrySnapshot, SnapshotEntry};
use crate::registry::{
    domain::{AgentDetails, AgentId, AgentKind, AgentName, AgentRecord, PersistedAgentData},
    ports::{PersistedAgent, PersistedRegistry, SnapshotError, SnapshotStore},
};
use crate::vault::{domain::VaultError, ports::SecretCipher};

/// Service-level errors for agent store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Reading or writing the registry document failed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Sealing a secret detail failed.
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// The document changed after the snapshot was loaded.
    #[error("registry changed concurrently: loaded revision {expected}, found {found}")]
    Conflict {
        /// Revision the snapshot was loaded at.
        expected: u64,
        /// Revision currently persisted.
        found: u64,
    },
}

/// Result type for agent store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Agent CRUD over a [`SnapshotStore`], sealing secrets with a
/// [`SecretCipher`].
pub struct AgentStore<S, V, C>
where
    S: SnapshotStore,
    V: SecretCipher,
    C: Clock + Send + Sync,
{
    snapshots: Arc<S>,
    cipher: Arc<V>,
    clock: Arc<C>,
    writer: Mutex<()>,
}

impl<S, V, C> AgentStore<S, V, C>
where
    S: SnapshotStore,
    V: SecretCipher,
    C: Clock + Send + Sync,
{
    /// Creates a store over the given document storage and cipher.
    #[must_use]
    pub fn new(snapshots: Arc<S>, cipher: Arc<V>, clock: Arc<C>) -> Self {
        Self {
            snapshots,
            cipher,
            clock,
            writer: Mutex::new(()),
        }
    }

    /// Loads the current registry.
    ///
    /// A missing document yields an empty snapshot at revision 0. Entries
    /// that cannot be decoded are quarantined and reported through
    /// [`RegistrySnapshot::failures`] instead of failing the load.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Snapshot`] when the document cannot be read or
    /// parsed as a whole.
    pub async fn load(&self) -> StoreResult<RegistrySnapshot> {
        let Some(document) = self.snapshots.read().await? else {
            return Ok(RegistrySnapshot::default());
        };
        Ok(self.decode(document))
    }

    /// Persists `snapshot`, returning the new revision.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the persisted revision is no
    /// longer the one `snapshot` was loaded at, [`StoreError::Vault`] when
    /// sealing fails, or [`StoreError::Snapshot`] on storage failure.
    pub async fn save(&self, snapshot: &RegistrySnapshot) -> StoreResult<u64> {
        let _guard = self.writer.lock().await;
        self.save_locked(snapshot).await
    }

    /// Registers a new agent and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the load or save fails.
    pub async fn add(
        &self,
        name: AgentName,
        kind: AgentKind,
        details: AgentDetails,
    ) -> StoreResult<AgentRecord> {
        let _guard = self.writer.lock().await;
        let mut snapshot = self.load().await?;
        let mut record = AgentRecord::new(name, kind, details, &*self.clock);
        while snapshot.contains_id(record.id()) {
            record = AgentRecord::new(
                record.name().clone(),
                kind,
                record.details().clone(),
                &*self.clock,
            );
        }
        snapshot.insert(record.clone());
        let revision = self.save_locked(&snapshot).await?;
        tracing::info!(agent_id = %record.id(), kind = %kind, revision, "registered agent");
        Ok(record)
    }

    /// Merges `patch` into the details of agent `id`.
    ///
    /// Returns `false` without writing when `id` is not a loaded agent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the load or save fails.
    pub async fn update(&self, id: AgentId, patch: AgentDetails) -> StoreResult<bool> {
        let _guard = self.writer.lock().await;
        let mut snapshot = self.load().await?;
        let Some(record) = snapshot.get_mut(id) else {
            tracing::debug!(agent_id = %id, "update skipped: agent not found");
            return Ok(false);
        };
        let keys = patch.len();
        record.merge_details(patch, &*self.clock);
        let revision = self.save_locked(&snapshot).await?;
        tracing::info!(agent_id = %id, keys, revision, "updated agent details");
        Ok(true)
    }

    /// Deletes agent `id`, returning whether it was present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the load or save fails.
    pub async fn remove(&self, id: AgentId) -> StoreResult<bool> {
        let _guard = self.writer.lock().await;
        let mut snapshot = self.load().await?;
        if !snapshot.remove(id) {
            return Ok(false);
        }
        let revision = self.save_locked(&snapshot).await?;
        tracing::info!(agent_id = %id, revision, "removed agent");
        Ok(true)
    }

    /// Looks up agent `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Snapshot`] when the document cannot be read.
    pub async fn get(&self, id: AgentId) -> StoreResult<Option<AgentRecord>> {
        let snapshot = self.load().await?;
        Ok(snapshot.get(id).cloned())
    }

    /// Returns every loaded agent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Snapshot`] when the document cannot be read.
    pub async fn list(&self) -> StoreResult<Vec<AgentRecord>> {
        Ok(self.load().await?.into_agents())
    }

    async fn save_locked(&self, snapshot: &RegistrySnapshot) -> StoreResult<u64> {
        let found = self
            .snapshots
            .read()
            .await?
            .map_or(0, |document| document.revision);
        if found != snapshot.revision() {
            tracing::warn!(
                expected = snapshot.revision(),
                found,
                "rejecting save of stale registry snapshot"
            );
            return Err(StoreError::Conflict {
                expected: snapshot.revision(),
                found,
            });
        }

        let agents = snapshot
            .entries()
            .iter()
            .map(|entry| match entry {
                SnapshotEntry::Live(record) => self.seal(record),
                SnapshotEntry::Quarantined(persisted) => Ok(persisted.clone()),
            })
            .collect::<StoreResult<Vec<_>>>()?;
        let revision = found + 1;
        self.snapshots
            .write(&PersistedRegistry::new(revision, agents))
            .await?;
        Ok(revision)
    }

    fn seal(&self, record: &AgentRecord) -> StoreResult<PersistedAgent> {
        let mut details = record.details().clone().into_inner();
        for field in record.kind().secret_fields() {
            if let Some(value) = details.get_mut(*field) {
                *value = self.cipher.encrypt(value)?;
            }
        }
        Ok(PersistedAgent {
            id: record.id().to_string(),
            name: record.name().to_string(),
            kind: record.kind().as_str().to_owned(),
            details,
            created_at: Some(record.created_at()),
            updated_at: Some(record.updated_at()),
        })
    }

    fn decode(&self, document: PersistedRegistry) -> RegistrySnapshot {
        let mut seen = BTreeSet::new();
        let mut entries = Vec::with_capacity(document.agents.len());
        let mut failures = Vec::new();
        for persisted in document.agents {
            match self.open(&persisted, &mut seen) {
                Ok(record) => entries.push(SnapshotEntry::Live(record)),
                Err(reason) => {
                    tracing::warn!(
                        agent_id = %persisted.id,
                        error = %reason,
                        "quarantined registry entry"
                    );
                    failures.push(RecordLoadFailure::new(
                        persisted.id.clone(),
                        persisted.name.clone(),
                        reason,
                    ));
                    entries.push(SnapshotEntry::Quarantined(persisted));
                }
            }
        }
        RegistrySnapshot::from_parts(document.revision, entries, failures)
    }

    fn open(
        &self,
        persisted: &PersistedAgent,
        seen: &mut BTreeSet<AgentId>,
    ) -> Result<AgentRecord, RecordLoadError> {
        let id = AgentId::parse(&persisted.id)?;
        if !seen.insert(id) {
            return Err(RecordLoadError::DuplicateId);
        }
        let kind = AgentKind::from_str(&persisted.kind)?;
        let name = AgentName::new(persisted.name.clone())?;

        let mut details = persisted.details.clone();
        for field in kind.secret_fields() {
            if let Some(value) = details.get_mut(*field) {
                *value = self
                    .cipher
                    .decrypt(value)
                    .map_err(|source| RecordLoadError::Decryption {
                        field: (*field).to_owned(),
                        source,
                    })?;
            }
        }

        let now = self.clock.utc();
        let created_at = persisted.created_at.unwrap_or(now);
        Ok(AgentRecord::from_persisted(PersistedAgentData {
            id,
            name,
            kind,
            details: AgentDetails::from(details),
            created_at,
            updated_at: persisted.updated_at.unwrap_or(created_at),
        }))
    }
}
