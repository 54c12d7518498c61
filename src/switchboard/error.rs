//! Error types surfaced to the transport layer.

use thiserror::Error;

use crate::registry::{
    domain::{AgentDomainError, AgentId, ParseAgentKindError},
    services::StoreError,
};

/// Client input that cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A name or identifier failed validation.
    #[error(transparent)]
    Agent(#[from] AgentDomainError),

    /// The kind label is not recognised.
    #[error(transparent)]
    Kind(#[from] ParseAgentKindError),
}

/// Errors returned by [`super::Switchboard`] operations.
#[derive(Debug, Clone, Error)]
pub enum SwitchboardError {
    /// The request was malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No agent has the given identifier.
    #[error("agent not found: {0}")]
    NotFound(AgentId),

    /// The registry could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AgentDomainError> for SwitchboardError {
    fn from(err: AgentDomainError) -> Self {
        Self::Validation(err.into())
    }
}

impl From<ParseAgentKindError> for SwitchboardError {
    fn from(err: ParseAgentKindError) -> Self {
        Self::Validation(err.into())
    }
}

/// Result type for switchboard operations.
pub type SwitchboardResult<T> = Result<T, SwitchboardError>;
