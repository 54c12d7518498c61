//! Shared fixtures for in-memory switchboard integration tests.

use std::sync::Arc;
use std::time::Duration;

use rstest::fixture;
use switchyard::{
    dispatch::{
        adapters::handlers::{ChainedHandlerLoader, FnHandler, ProcessHandlerLoader, StaticHandlerLoader},
        domain::ShellMode,
        ports::HandlerError,
        services::Dispatcher,
    },
    registry::domain::{AgentDetails, detail_keys},
    switchboard::{InMemorySwitchboard, RegisterAgentRequest, in_memory},
};

/// Handler path resolving to an in-process uppercase handler.
pub const SHOUT_HANDLER: &str = "plugins/shout";

/// Handler path resolving to an in-process handler that always fails.
pub const BROKEN_HANDLER: &str = "plugins/broken";

/// Provides a switchboard with in-process handlers, falling back to
/// executables on disk.
#[fixture]
pub fn switchboard() -> InMemorySwitchboard {
    let loader = StaticHandlerLoader::new()
        .with_handler(
            SHOUT_HANDLER,
            Arc::new(FnHandler::new(|input: &str| Ok(input.to_uppercase()))),
        )
        .with_handler(
            BROKEN_HANDLER,
            Arc::new(FnHandler::new(|_: &str| {
                Err(HandlerError::Failed("model weights missing".to_owned()))
            })),
        );
    let chain = ChainedHandlerLoader::new()
        .then(Arc::new(loader))
        .then(Arc::new(ProcessHandlerLoader::new()));
    let dispatcher = Dispatcher::standard(Duration::from_secs(2), ShellMode::Shell, Arc::new(chain))
        .expect("dispatcher should build");
    in_memory(dispatcher)
}

/// Request for a shell agent described as an echo service.
#[must_use]
pub fn echo_agent() -> RegisterAgentRequest {
    RegisterAgentRequest::new(
        "Echo",
        "shell_command",
        AgentDetails::new()
            .with(detail_keys::DESCRIPTION, "Echo service")
            .with(detail_keys::COMMAND, "echo"),
    )
}

/// Request for a remote API agent pointing at `endpoint`.
#[must_use]
pub fn api_agent(description: &str, endpoint: &str) -> RegisterAgentRequest {
    RegisterAgentRequest::new(
        "Remote",
        "remote_api",
        AgentDetails::new()
            .with(detail_keys::DESCRIPTION, description)
            .with(detail_keys::ENDPOINT, endpoint)
            .with(detail_keys::CREDENTIAL, "sk-integration"),
    )
}

/// Request for a handler agent of `kind` resolving `path`.
#[must_use]
pub fn handler_agent(kind: &str, description: &str, path: &str) -> RegisterAgentRequest {
    RegisterAgentRequest::new(
        "Handler",
        kind,
        AgentDetails::new()
            .with(detail_keys::DESCRIPTION, description)
            .with(detail_keys::HANDLER_PATH, path),
    )
}

/// Owned token list.
#[must_use]
pub fn tokens(words: &[&str]) -> Vec<String> {
    words.iter().map(|word| (*word).to_owned()).collect()
}
