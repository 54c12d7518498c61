//! Per-kind invocation port.

use async_trait::async_trait;

use crate::dispatch::domain::InvocationError;
use crate::registry::domain::AgentRecord;

/// Invokes one agent with request text.
///
/// Adapters may assume the dispatcher has already checked the record's
/// required details and will enforce the timeout itself.
#[async_trait]
pub trait AgentAdapter: Send + Sync {
    /// Sends `input` to `agent` and returns its textual output.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError`] describing why no output was produced.
    async fn invoke(&self, agent: &AgentRecord, input: &str) -> Result<String, InvocationError>;
}
