//! In-memory integration tests for selection and dispatch.

use rstest::rstest;
use switchyard::{
    registry::domain::AgentDetails,
    routing::{AnalyzedRequest, NO_MATCH},
    switchboard::{InMemorySwitchboard, RegisterAgentRequest},
};

use super::helpers::{
    BROKEN_HANDLER, SHOUT_HANDLER, api_agent, echo_agent, handler_agent, switchboard, tokens,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn echo_agent_returns_input(switchboard: InMemorySwitchboard) {
    switchboard
        .register(echo_agent())
        .await
        .expect("registration should succeed");

    let output = switchboard
        .route(&AnalyzedRequest::new("hello from the router", tokens(&["echo"])))
        .await
        .expect("route should succeed");

    assert_eq!(output, "hello from the router\n");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unmatched_tokens_return_no_match(switchboard: InMemorySwitchboard) {
    switchboard
        .register(echo_agent())
        .await
        .expect("registration should succeed");

    let output = switchboard
        .route(&AnalyzedRequest::new("forecast", tokens(&["forecast"])))
        .await
        .expect("route should succeed");

    assert_eq!(output, NO_MATCH);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn first_registered_match_wins(switchboard: InMemorySwitchboard) {
    switchboard
        .register(handler_agent("script_bot", "shouting echo", SHOUT_HANDLER))
        .await
        .expect("registration should succeed");
    switchboard
        .register(echo_agent())
        .await
        .expect("registration should succeed");

    let output = switchboard
        .route(&AnalyzedRequest::new("quiet", tokens(&["echo"])))
        .await
        .expect("route should succeed");

    assert_eq!(output, "QUIET");
}

#[rstest]
#[case::script_bot("script_bot")]
#[case::custom_handler("custom_handler")]
#[tokio::test(flavor = "multi_thread")]
async fn handler_agents_resolve_the_handler_path_detail(
    switchboard: InMemorySwitchboard,
    #[case] kind: &str,
) {
    switchboard
        .register(RegisterAgentRequest::new(
            "Upper",
            kind,
            AgentDetails::new()
                .with("description", "shouting service")
                .with("handlerPath", SHOUT_HANDLER),
        ))
        .await
        .expect("registration should succeed");

    let output = switchboard
        .route(&AnalyzedRequest::new("hello", tokens(&["shouting"])))
        .await
        .expect("route should succeed");

    assert_eq!(output, "HELLO");
}

#[rstest]
#[case::unreachable_endpoint(api_agent("failing", "http://127.0.0.1:1/agent"), "Error from API:")]
#[case::non_zero_exit(
    RegisterAgentRequest::new(
        "Exit",
        "shell_command",
        AgentDetails::new()
            .with("description", "failing")
            .with("command", "echo failure >&2; exit 3; true"),
    ),
    "Error running shell command: failure"
)]
#[case::missing_entry_point(
    handler_agent("custom_handler", "failing", "/"),
    "Error: handler '/' does not provide an entry point"
)]
#[case::absent_handler(
    handler_agent("script_bot", "failing", "plugins/absent"),
    "Error processing with handler: handler not found"
)]
#[case::failing_handler(
    handler_agent("custom_handler", "failing", BROKEN_HANDLER),
    "Error processing with handler: model weights missing"
)]
#[tokio::test(flavor = "multi_thread")]
async fn failing_backends_still_return_strings(
    switchboard: InMemorySwitchboard,
    #[case] request: RegisterAgentRequest,
    #[case] expected_prefix: &str,
) {
    switchboard
        .register(request)
        .await
        .expect("registration should succeed");

    let output = switchboard
        .route(&AnalyzedRequest::new("anything", tokens(&["failing"])))
        .await
        .expect("route should succeed");

    assert!(
        output.starts_with(expected_prefix),
        "unexpected result: {output}"
    );
}
