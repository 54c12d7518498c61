//! Registration request payload.

use crate::registry::domain::AgentDetails;

/// Unvalidated registration input as received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterAgentRequest {
    name: String,
    kind: String,
    details: AgentDetails,
}

impl RegisterAgentRequest {
    /// Creates a request. `kind` accepts canonical and legacy labels.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>, details: AgentDetails) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            details,
        }
    }

    pub(super) fn into_parts(self) -> (String, String, AgentDetails) {
        (self.name, self.kind, self.details)
    }
}
