//! Error types for agent domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing agent domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentDomainError {
    /// The agent name is empty after trimming.
    #[error("agent name must not be empty")]
    EmptyAgentName,

    /// The agent name exceeds the display limit.
    #[error("agent name exceeds 200 character limit: {0}")]
    AgentNameTooLong(String),

    /// The agent identifier is not a UUID.
    #[error("invalid agent identifier: {0}")]
    InvalidAgentId(String),
}

/// Error returned while parsing an agent kind label.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent kind: {0}")]
pub struct ParseAgentKindError(pub String);
