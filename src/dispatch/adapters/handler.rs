//! Adapter for agents backed by a loadable handler.

use std::sync::Arc;

use async_trait::async_trait;

use super::required_detail;
use crate::dispatch::{
    domain::InvocationError,
    ports::{AgentAdapter, HandlerLoadError, HandlerLoader},
};
use crate::registry::domain::{AgentRecord, detail_keys};

/// Adapter for script bot and custom handler agents.
///
/// Resolves `handlerPath` through a [`HandlerLoader`] on every call and
/// passes the request text to the loaded handler.
#[derive(Clone)]
pub struct HandlerAdapter {
    loader: Arc<dyn HandlerLoader>,
}

impl HandlerAdapter {
    /// Creates an adapter resolving handlers through `loader`.
    #[must_use]
    pub const fn new(loader: Arc<dyn HandlerLoader>) -> Self {
        Self { loader }
    }
}

#[async_trait]
impl AgentAdapter for HandlerAdapter {
    async fn invoke(&self, agent: &AgentRecord, input: &str) -> Result<String, InvocationError> {
        let path = required_detail(agent, detail_keys::HANDLER_PATH)?;
        let handler = self.loader.load(path).await.map_err(|err| match err {
            HandlerLoadError::MissingEntryPoint(missing) => InvocationError::MissingEntryPoint(missing),
            other => InvocationError::Handler(other.to_string()),
        })?;
        handler
            .process(input)
            .await
            .map_err(|err| InvocationError::Handler(err.to_string()))
    }
}
