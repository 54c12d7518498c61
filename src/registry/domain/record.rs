//! Agent record aggregate root.

use super::{AgentDetails, AgentId, AgentKind, AgentName};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Placeholder shown instead of secret values in redacted views.
pub const REDACTED: &str = "********";

/// A registered agent with plaintext details.
///
/// `id` and `kind` are fixed at creation. Only the details change after
/// registration, through [`AgentRecord::merge_details`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    id: AgentId,
    name: AgentName,
    kind: AgentKind,
    details: AgentDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted agent record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAgentData {
    /// Persisted agent identifier.
    pub id: AgentId,
    /// Persisted display name.
    pub name: AgentName,
    /// Persisted invocation strategy.
    pub kind: AgentKind,
    /// Persisted details, already opened by the vault.
    pub details: AgentDetails,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl AgentRecord {
    /// Creates a new record with a freshly generated identifier.
    #[must_use]
    pub fn new(name: AgentName, kind: AgentKind, details: AgentDetails, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: AgentId::new(),
            name,
            kind,
            details,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAgentData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            kind: data.kind,
            details: data.details,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the agent identifier.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &AgentName {
        &self.name
    }

    /// Returns the invocation strategy.
    #[must_use]
    pub const fn kind(&self) -> AgentKind {
        self.kind
    }

    /// Returns the plaintext details.
    #[must_use]
    pub const fn details(&self) -> &AgentDetails {
        &self.details
    }

    /// Returns the description used for selection.
    #[must_use]
    pub fn description(&self) -> &str {
        self.details.description()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Merges `patch` into the details and touches `updated_at`.
    pub fn merge_details(&mut self, patch: AgentDetails, clock: &impl Clock) {
        self.details.merge(patch);
        self.updated_at = clock.utc();
    }

    /// Required detail keys for this record's kind that are absent.
    ///
    /// Registration is permissive; this is checked at dispatch time.
    #[must_use]
    pub fn missing_required_details(&self) -> Vec<&'static str> {
        self.kind
            .required_details()
            .iter()
            .copied()
            .filter(|key| !self.details.contains_key(key))
            .collect()
    }

    /// Returns a copy with every secret detail replaced by [`REDACTED`].
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for field in self.kind.secret_fields() {
            if let Some(value) = copy.details.get_mut(field) {
                REDACTED.clone_into(value);
            }
        }
        copy
    }
}
