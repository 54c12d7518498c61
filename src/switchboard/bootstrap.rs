//! Wiring of concrete adapters into a ready switchboard.

use std::sync::Arc;

use mockable::DefaultClock;
use thiserror::Error;

use super::Switchboard;
use crate::config::SwitchyardConfig;
use crate::dispatch::{adapters::handlers::ProcessHandlerLoader, services::Dispatcher};
use crate::registry::{
    adapters::{InMemorySnapshotStore, JsonFileSnapshotStore},
    services::AgentStore,
};
use crate::vault::{
    adapters::{FileKeyStore, InMemoryKeyStore},
    services::CredentialVault,
};

/// Switchboard persisting to the configured data directory.
pub type FileSwitchboard =
    Switchboard<JsonFileSnapshotStore, CredentialVault<FileKeyStore>, DefaultClock>;

/// Switchboard holding everything in memory.
pub type InMemorySwitchboard =
    Switchboard<InMemorySnapshotStore, CredentialVault<InMemoryKeyStore>, DefaultClock>;

/// Errors raised while assembling a switchboard.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The HTTP client for remote API agents could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Opens the file-backed switchboard described by `config`.
///
/// Nothing touches the disk until the first operation. The vault key is
/// created on first use.
///
/// # Errors
///
/// Returns [`BootstrapError::HttpClient`] when the HTTP client cannot be
/// built.
pub fn open(config: &SwitchyardConfig) -> Result<FileSwitchboard, BootstrapError> {
    let snapshots = JsonFileSnapshotStore::new(config.data_dir.clone(), config.registry_file.clone());
    let keys = FileKeyStore::new(config.data_dir.clone(), config.key_file.clone());
    let store = AgentStore::new(
        Arc::new(snapshots),
        Arc::new(CredentialVault::new(Arc::new(keys))),
        Arc::new(DefaultClock),
    );
    let dispatcher = Dispatcher::standard(
        config.dispatch.timeout(),
        config.dispatch.shell_mode,
        Arc::new(ProcessHandlerLoader::new()),
    )?;
    tracing::debug!(data_dir = %config.data_dir, "opened switchboard");
    Ok(Switchboard::new(store, dispatcher))
}

/// Creates an empty in-memory switchboard around `dispatcher`.
#[must_use]
pub fn in_memory(dispatcher: Dispatcher) -> InMemorySwitchboard {
    let store = AgentStore::new(
        Arc::new(InMemorySnapshotStore::new()),
        Arc::new(CredentialVault::new(Arc::new(InMemoryKeyStore::new()))),
        Arc::new(DefaultClock),
    );
    Switchboard::new(store, dispatcher)
}
