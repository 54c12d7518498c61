//! In-memory integration tests for registry operations.

use rstest::rstest;
use switchyard::{
    registry::domain::{AgentDetails, AgentId, AgentKind, REDACTED, detail_keys},
    switchboard::{InMemorySwitchboard, RegisterAgentRequest},
};

use super::helpers::{api_agent, echo_agent, switchboard};

#[rstest]
#[case("remote_api", AgentKind::RemoteApi)]
#[case("Bot", AgentKind::ScriptBot)]
#[case("Local AI", AgentKind::ShellCommand)]
#[case("Custom AI", AgentKind::CustomHandler)]
#[tokio::test(flavor = "multi_thread")]
async fn register_then_fetch_preserves_input(
    switchboard: InMemorySwitchboard,
    #[case] label: &str,
    #[case] kind: AgentKind,
) {
    let details = AgentDetails::new()
        .with(detail_keys::DESCRIPTION, "round trip")
        .with(detail_keys::CREDENTIAL, "sk-round-trip")
        .with("extra", "value");

    let id = switchboard
        .register(RegisterAgentRequest::new("Agent", label, details.clone()))
        .await
        .expect("registration should succeed");
    let record = switchboard
        .fetch_required(id)
        .await
        .expect("agent should exist");

    assert_eq!(record.id(), id);
    assert_eq!(record.name().as_str(), "Agent");
    assert_eq!(record.kind(), kind);
    assert_eq!(record.details(), &details);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn modify_preserves_untouched_keys(switchboard: InMemorySwitchboard) {
    let id = switchboard
        .register(api_agent("weather", "https://old.example"))
        .await
        .expect("registration should succeed");

    let changed = switchboard
        .modify(
            id,
            AgentDetails::new().with(detail_keys::ENDPOINT, "https://new.example"),
        )
        .await
        .expect("modify should succeed");

    assert!(changed);
    let record = switchboard.fetch_required(id).await.expect("agent exists");
    assert_eq!(
        record.details().get(detail_keys::ENDPOINT),
        Some("https://new.example")
    );
    assert_eq!(
        record.details().get(detail_keys::CREDENTIAL),
        Some("sk-integration")
    );
    assert_eq!(record.description(), "weather");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn modify_unknown_id_returns_false(switchboard: InMemorySwitchboard) {
    switchboard
        .register(echo_agent())
        .await
        .expect("registration should succeed");
    let before = switchboard.enumerate().await.expect("list");

    let changed = switchboard
        .modify(AgentId::new(), AgentDetails::new().with("k", "v"))
        .await
        .expect("modify should succeed");

    assert!(!changed);
    assert_eq!(switchboard.enumerate().await.expect("list"), before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unregister_twice_reports_absence(switchboard: InMemorySwitchboard) {
    let id = switchboard
        .register(echo_agent())
        .await
        .expect("registration should succeed");

    assert!(switchboard.unregister(id).await.expect("first removal"));
    assert!(!switchboard.unregister(id).await.expect("second removal"));
    assert!(switchboard.enumerate().await.expect("list").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn enumerate_lists_every_agent(switchboard: InMemorySwitchboard) {
    let first = switchboard
        .register(echo_agent())
        .await
        .expect("registration should succeed");
    let second = switchboard
        .register(api_agent("weather", "https://api.example"))
        .await
        .expect("registration should succeed");

    let ids: Vec<AgentId> = switchboard
        .enumerate()
        .await
        .expect("list")
        .iter()
        .map(|record| record.id())
        .collect();

    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first));
    assert!(ids.contains(&second));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn redacted_view_hides_credentials(switchboard: InMemorySwitchboard) {
    let id = switchboard
        .register(api_agent("weather", "https://api.example"))
        .await
        .expect("registration should succeed");

    let record = switchboard.fetch_required(id).await.expect("agent exists");
    let rendered = serde_json::to_string(&record.redacted()).expect("serialise");

    assert!(!rendered.contains("sk-integration"));
    assert!(rendered.contains(REDACTED));
}
