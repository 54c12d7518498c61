//! Behaviour tests for registering agents and routing requests to them.

use std::sync::Arc;
use std::time::Duration;

use eyre::{WrapErr, eyre};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use switchyard::{
    dispatch::{adapters::handlers::StaticHandlerLoader, domain::ShellMode, services::Dispatcher},
    registry::domain::{AgentDetails, AgentId, detail_keys},
    routing::AnalyzedRequest,
    switchboard::{InMemorySwitchboard, RegisterAgentRequest, in_memory},
};

struct RoutingWorld {
    switchboard: InMemorySwitchboard,
    agent_id: Option<AgentId>,
    result: Option<String>,
}

impl RoutingWorld {
    fn new() -> Result<Self, eyre::Report> {
        let dispatcher = Dispatcher::standard(
            Duration::from_secs(10),
            ShellMode::Shell,
            Arc::new(StaticHandlerLoader::new()),
        )
        .wrap_err("dispatcher should build")?;
        Ok(Self {
            switchboard: in_memory(dispatcher),
            agent_id: None,
            result: None,
        })
    }

    fn agent_id(&self) -> Result<AgentId, eyre::Report> {
        self.agent_id
            .ok_or_else(|| eyre!("an agent should have been registered"))
    }

    fn result(&self) -> Result<&str, eyre::Report> {
        self.result
            .as_deref()
            .ok_or_else(|| eyre!("a request should have been routed"))
    }

    fn register(&mut self, request: RegisterAgentRequest) -> Result<(), eyre::Report> {
        let id = run_async(self.switchboard.register(request)).wrap_err("registration")?;
        self.agent_id = Some(id);
        Ok(())
    }
}

#[fixture]
fn world() -> RoutingWorld {
    RoutingWorld::new().unwrap_or_else(|err| panic!("routing world should build: {err:?}"))
}

fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

#[given(r#"a shell agent named "{name}" described as "{description}" running "{command}""#)]
fn shell_agent(
    world: &mut RoutingWorld,
    name: String,
    description: String,
    command: String,
) -> Result<(), eyre::Report> {
    world.register(RegisterAgentRequest::new(
        name,
        "shell_command",
        AgentDetails::new()
            .with(detail_keys::DESCRIPTION, description)
            .with(detail_keys::COMMAND, command),
    ))
}

#[given(r#"a remote API agent named "{name}" described as "{description}" at "{endpoint}""#)]
fn remote_api_agent(
    world: &mut RoutingWorld,
    name: String,
    description: String,
    endpoint: String,
) -> Result<(), eyre::Report> {
    world.register(RegisterAgentRequest::new(
        name,
        "API",
        AgentDetails::new()
            .with(detail_keys::DESCRIPTION, description)
            .with(detail_keys::ENDPOINT, endpoint)
            .with(detail_keys::CREDENTIAL, "sk-test"),
    ))
}

#[when(r#"the agent command is changed to "{command}""#)]
fn change_command(world: &mut RoutingWorld, command: String) -> Result<(), eyre::Report> {
    let id = world.agent_id()?;
    run_async(
        world
            .switchboard
            .modify_required(id, AgentDetails::new().with(detail_keys::COMMAND, command)),
    )
    .wrap_err("modify should succeed")
}

#[when("the agent is unregistered")]
fn unregister_agent(world: &mut RoutingWorld) -> Result<(), eyre::Report> {
    let id = world.agent_id()?;
    run_async(world.switchboard.unregister_required(id)).wrap_err("unregister should succeed")
}

#[when(r#"the request "{text}" is routed with token "{token}""#)]
fn route_request(world: &mut RoutingWorld, text: String, token: String) -> Result<(), eyre::Report> {
    let request = AnalyzedRequest::new(text, vec![token]);
    let output = run_async(world.switchboard.route(&request)).wrap_err("route should succeed")?;
    world.result = Some(output);
    Ok(())
}

#[then(r#"the result is "{expected}""#)]
fn result_is(world: &RoutingWorld, expected: String) -> Result<(), eyre::Report> {
    let actual = world.result()?.trim_end();
    if actual != expected {
        return Err(eyre!("expected result '{expected}', got '{actual}'"));
    }
    Ok(())
}

#[then(r#"the result starts with "{prefix}""#)]
fn result_starts_with(world: &RoutingWorld, prefix: String) -> Result<(), eyre::Report> {
    let actual = world.result()?;
    if !actual.starts_with(&prefix) {
        return Err(eyre!("expected result starting with '{prefix}', got '{actual}'"));
    }
    Ok(())
}

#[scenario(
    path = "tests/features/agent_routing.feature",
    name = "Shell agent echoes the request"
)]
#[tokio::test(flavor = "multi_thread")]
async fn shell_agent_echoes(world: RoutingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/agent_routing.feature",
    name = "Unmatched request reports that no agent fits"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unmatched_request(world: RoutingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/agent_routing.feature",
    name = "Unreachable remote API still yields a result string"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unreachable_remote_api(world: RoutingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/agent_routing.feature",
    name = "Modified details are used for the next request"
)]
#[tokio::test(flavor = "multi_thread")]
async fn modified_details(world: RoutingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/agent_routing.feature",
    name = "Unregistered agents are no longer selected"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unregistered_agent(world: RoutingWorld) {
    let _ = world;
}
