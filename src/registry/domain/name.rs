//! Validated agent display name.

use super::AgentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_NAME_LENGTH: usize = 200;

/// Operator-supplied display name. Names are not unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentName(String);

impl AgentName {
    /// Creates a validated agent name.
    ///
    /// The input is trimmed; case and inner whitespace are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyAgentName`] when the value is empty
    /// after trimming or [`AgentDomainError::AgentNameTooLong`] when it
    /// exceeds 200 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, AgentDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(AgentDomainError::EmptyAgentName);
        }

        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(AgentDomainError::AgentNameTooLong(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AgentName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
