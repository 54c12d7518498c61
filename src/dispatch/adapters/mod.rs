//! Adapter implementations for each agent kind and for handler loading.

pub mod handler;
pub mod handlers;
pub mod remote_api;
pub mod shell;

pub use handler::HandlerAdapter;
pub use remote_api::RemoteApiAdapter;
pub use shell::ShellCommandAdapter;

use crate::dispatch::domain::InvocationError;
use crate::registry::domain::AgentRecord;

/// Returns detail `key` of `agent` or the missing-detail error.
fn required_detail<'a>(
    agent: &'a AgentRecord,
    key: &'static str,
) -> Result<&'a str, InvocationError> {
    agent
        .details()
        .get(key)
        .ok_or_else(|| InvocationError::MissingDetail {
            agent: agent.name().to_string(),
            key,
        })
}
