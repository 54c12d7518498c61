//! Invocation failures and their user-facing result strings.

use std::time::Duration;

use thiserror::Error;

use crate::registry::domain::AgentKind;

/// Result returned when a remote API response carries no `output` field.
pub const NO_OUTPUT: &str = "No output from API";

/// Why an agent invocation did not produce output.
///
/// The `Display` form of each variant is the result string handed back to
/// callers of [`crate::dispatch::services::Dispatcher::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    /// No adapter is registered for the agent's kind.
    #[error("Unsupported agent type: {0}")]
    Unsupported(AgentKind),

    /// The record lacks a detail its kind requires.
    #[error("Error: agent '{agent}' is missing required detail '{key}'")]
    MissingDetail {
        /// Agent display name.
        agent: String,
        /// First missing detail key.
        key: &'static str,
    },

    /// The remote endpoint could not be reached or answered with an error.
    #[error("Error from API: {0}")]
    Api(String),

    /// The command could not be started or exited unsuccessfully.
    #[error("Error running shell command: {0}")]
    Shell(String),

    /// The agent exceeded the dispatch timeout.
    #[error("Error: agent timed out after {0:?}")]
    TimedOut(Duration),

    /// The handler was found but cannot be invoked.
    #[error("Error: handler '{0}' does not provide an entry point")]
    MissingEntryPoint(String),

    /// Loading or running the handler failed.
    #[error("Error processing with handler: {0}")]
    Handler(String),

    /// The adapter task panicked or was cancelled.
    #[error("Error: agent invocation aborted: {0}")]
    Aborted(String),
}

/// Renders `err` followed by each distinct message in its source chain.
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
