//! Application services for the agent registry.

mod snapshot;
mod store;

pub use snapshot::{RecordLoadError, RecordLoadFailure, RegistrySnapshot};
pub use store::{AgentStore, StoreError, StoreResult};
