//! Domain model for agent registration.
//!
//! All infrastructure concerns (sealing, persistence format) are kept
//! outside the domain boundary.

mod details;
mod error;
mod ids;
mod kind;
mod name;
mod record;

pub use details::{AgentDetails, detail_keys};
pub use error::{AgentDomainError, ParseAgentKindError};
pub use ids::AgentId;
pub use kind::AgentKind;
pub use name::AgentName;
pub use record::{AgentRecord, PersistedAgentData, REDACTED};
