//! Remote HTTP API adapter.
//!
//! Sends `{"input": <text>}` as a JSON POST to the agent's endpoint with the
//! credential as a bearer token, and returns the `output` field of the JSON
//! reply.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::required_detail;
use crate::dispatch::{
    domain::{InvocationError, NO_OUTPUT, error_chain},
    ports::AgentAdapter,
};
use crate::registry::domain::{AgentRecord, detail_keys};

#[derive(Serialize)]
struct ApiRequest<'a> {
    input: &'a str,
}

/// Adapter for [`crate::registry::domain::AgentKind::RemoteApi`] agents.
#[derive(Debug, Clone)]
pub struct RemoteApiAdapter {
    client: Client,
    timeout: Duration,
}

impl RemoteApiAdapter {
    /// Builds an adapter whose HTTP client gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] when the TLS backend cannot be
    /// initialised.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("switchyard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, timeout })
    }

    /// Wraps a preconfigured client.
    #[must_use]
    pub const fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn failure(&self, err: &reqwest::Error) -> InvocationError {
        if err.is_timeout() {
            InvocationError::TimedOut(self.timeout)
        } else {
            InvocationError::Api(error_chain(err))
        }
    }
}

#[async_trait]
impl AgentAdapter for RemoteApiAdapter {
    async fn invoke(&self, agent: &AgentRecord, input: &str) -> Result<String, InvocationError> {
        let endpoint = required_detail(agent, detail_keys::ENDPOINT)?;
        let credential = required_detail(agent, detail_keys::CREDENTIAL)?;

        let response = self
            .client
            .post(endpoint)
            .bearer_auth(credential)
            .json(&ApiRequest { input })
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| self.failure(&err))?;
        let body: Value = response.json().await.map_err(|err| self.failure(&err))?;

        Ok(match body.get("output") {
            Some(Value::String(output)) => output.clone(),
            Some(Value::Null) | None => NO_OUTPUT.to_owned(),
            Some(other) => other.to_string(),
        })
    }
}
