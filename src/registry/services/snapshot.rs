//! Decoded view of the registry document.

use thiserror::Error;

use crate::registry::{
    domain::{AgentDomainError, AgentId, AgentRecord, ParseAgentKindError},
    ports::PersistedAgent,
};
use crate::vault::domain::VaultError;

/// Why one persisted entry could not be turned into an [`AgentRecord`].
#[derive(Debug, Clone, Error)]
pub enum RecordLoadError {
    /// The identifier or name failed validation.
    #[error(transparent)]
    Invalid(#[from] AgentDomainError),

    /// The kind label is not recognised.
    #[error(transparent)]
    UnknownKind(#[from] ParseAgentKindError),

    /// A secret detail could not be opened with the current key.
    #[error("cannot open secret detail '{field}': {source}")]
    Decryption {
        /// Detail key that failed.
        field: String,
        /// Vault failure.
        #[source]
        source: VaultError,
    },

    /// Another entry earlier in the document has the same identifier.
    #[error("duplicate agent identifier")]
    DuplicateId,
}

/// A persisted entry that was quarantined during load.
#[derive(Debug, Clone)]
pub struct RecordLoadFailure {
    id: String,
    name: String,
    reason: RecordLoadError,
}

impl RecordLoadFailure {
    pub(crate) const fn new(id: String, name: String, reason: RecordLoadError) -> Self {
        Self { id, name, reason }
    }

    /// Raw identifier as stored.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw name as stored.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reason the entry was quarantined.
    #[must_use]
    pub const fn reason(&self) -> &RecordLoadError {
        &self.reason
    }
}

#[derive(Debug, Clone)]
pub(crate) enum SnapshotEntry {
    Live(AgentRecord),
    Quarantined(PersistedAgent),
}

/// All agents loaded from one revision of the registry document.
///
/// Entries keep registration order. Entries that failed to load stay in
/// place as opaque quarantined data so that saving the snapshot writes them
/// back untouched.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    revision: u64,
    entries: Vec<SnapshotEntry>,
    failures: Vec<RecordLoadFailure>,
}

impl RegistrySnapshot {
    pub(crate) const fn from_parts(
        revision: u64,
        entries: Vec<SnapshotEntry>,
        failures: Vec<RecordLoadFailure>,
    ) -> Self {
        Self {
            revision,
            entries,
            failures,
        }
    }

    pub(crate) fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    /// Revision of the document this snapshot was loaded from.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Entries quarantined during load.
    #[must_use]
    pub fn failures(&self) -> &[RecordLoadFailure] {
        &self.failures
    }

    /// Loaded agents in registration order.
    pub fn agents(&self) -> impl Iterator<Item = &AgentRecord> {
        self.entries.iter().filter_map(|entry| match entry {
            SnapshotEntry::Live(record) => Some(record),
            SnapshotEntry::Quarantined(_) => None,
        })
    }

    /// Number of loaded agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents().count()
    }

    /// Returns `true` when no agent loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents().next().is_none()
    }

    /// Looks up a loaded agent.
    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&AgentRecord> {
        self.agents().find(|record| record.id() == id)
    }

    /// Looks up a loaded agent for mutation.
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut AgentRecord> {
        self.entries.iter_mut().find_map(|entry| match entry {
            SnapshotEntry::Live(record) if record.id() == id => Some(record),
            _ => None,
        })
    }

    /// Returns `true` when `id` is taken by a loaded or quarantined entry.
    #[must_use]
    pub fn contains_id(&self, id: AgentId) -> bool {
        let raw = id.to_string();
        self.entries.iter().any(|entry| match entry {
            SnapshotEntry::Live(record) => record.id() == id,
            SnapshotEntry::Quarantined(persisted) => persisted.id.eq_ignore_ascii_case(&raw),
        })
    }

    /// Appends a record.
    pub fn insert(&mut self, record: AgentRecord) {
        self.entries.push(SnapshotEntry::Live(record));
    }

    /// Removes every entry with identifier `id`, loaded or quarantined,
    /// returning whether anything was removed.
    ///
    /// Quarantined entries match on their raw identifier ignoring ASCII
    /// case, so a record that no longer decrypts can still be deleted.
    pub fn remove(&mut self, id: AgentId) -> bool {
        let raw = id.to_string();
        let before = self.entries.len();
        self.entries.retain(|entry| match entry {
            SnapshotEntry::Live(record) => record.id() != id,
            SnapshotEntry::Quarantined(persisted) => !persisted.id.eq_ignore_ascii_case(&raw),
        });
        self.failures
            .retain(|failure| !failure.id.eq_ignore_ascii_case(&raw));
        self.entries.len() != before
    }

    /// Consumes the snapshot, returning the loaded agents.
    #[must_use]
    pub fn into_agents(self) -> Vec<AgentRecord> {
        self.entries
            .into_iter()
            .filter_map(|entry| match entry {
                SnapshotEntry::Live(record) => Some(record),
                SnapshotEntry::Quarantined(_) => None,
            })
            .collect()
    }
}
