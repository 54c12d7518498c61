//! Port contracts for agent registry persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by registry
//! services.

pub mod snapshot;

pub use snapshot::{
    PersistedAgent, PersistedRegistry, SnapshotError, SnapshotResult, SnapshotStore,
};
