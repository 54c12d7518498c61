//! Switchboard service.

use std::str::FromStr;
use std::sync::Arc;

use mockable::Clock;

use super::{RegisterAgentRequest, SwitchboardError, SwitchboardResult};
use crate::dispatch::services::Dispatcher;
use crate::registry::{
    domain::{AgentDetails, AgentId, AgentKind, AgentName, AgentRecord},
    ports::SnapshotStore,
    services::AgentStore,
};
use crate::routing::{
    AgentSelector, AnalyzedRequest, FirstMatchSelector, NO_MATCH, StopwordTokenizer, Tokenizer,
};
use crate::vault::ports::SecretCipher;

/// Registry operations plus request routing.
pub struct Switchboard<S, V, C>
where
    S: SnapshotStore,
    V: SecretCipher,
    C: Clock + Send + Sync,
{
    store: AgentStore<S, V, C>,
    dispatcher: Dispatcher,
    selector: Arc<dyn AgentSelector>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl<S, V, C> Switchboard<S, V, C>
where
    S: SnapshotStore,
    V: SecretCipher,
    C: Clock + Send + Sync,
{
    /// Creates a switchboard using first-match selection and the stopword
    /// tokenizer.
    #[must_use]
    pub fn new(store: AgentStore<S, V, C>, dispatcher: Dispatcher) -> Self {
        Self {
            store,
            dispatcher,
            selector: Arc::new(FirstMatchSelector),
            tokenizer: Arc::new(StopwordTokenizer::new()),
        }
    }

    /// Replaces the selection strategy.
    #[must_use]
    pub fn with_selector(mut self, selector: Arc<dyn AgentSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Replaces the tokenizer used by [`Self::route_text`].
    #[must_use]
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &AgentStore<S, V, C> {
        &self.store
    }

    /// Returns the dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Registers an agent and returns its new identifier.
    ///
    /// Details are not checked against the kind here; incomplete records
    /// are rejected when dispatched.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchboardError::Validation`] for a blank or overlong name
    /// or an unknown kind, or [`SwitchboardError::Store`] when persistence
    /// fails.
    pub async fn register(&self, request: RegisterAgentRequest) -> SwitchboardResult<AgentId> {
        let (name, kind, details) = request.into_parts();
        let agent_name = AgentName::new(name)?;
        let agent_kind = AgentKind::from_str(&kind)?;
        let record = self.store.add(agent_name, agent_kind, details).await?;
        Ok(record.id())
    }

    /// Merges `patch` into the details of agent `id`.
    ///
    /// Returns `false` when no such agent exists.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchboardError::Store`] when persistence fails.
    pub async fn modify(&self, id: AgentId, patch: AgentDetails) -> SwitchboardResult<bool> {
        Ok(self.store.update(id, patch).await?)
    }

    /// Like [`Self::modify`], but an unknown identifier is an error.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchboardError::NotFound`] when no such agent exists, or
    /// [`SwitchboardError::Store`] when persistence fails.
    pub async fn modify_required(&self, id: AgentId, patch: AgentDetails) -> SwitchboardResult<()> {
        if self.modify(id, patch).await? {
            Ok(())
        } else {
            Err(SwitchboardError::NotFound(id))
        }
    }

    /// Removes agent `id`, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchboardError::Store`] when persistence fails.
    pub async fn unregister(&self, id: AgentId) -> SwitchboardResult<bool> {
        Ok(self.store.remove(id).await?)
    }

    /// Like [`Self::unregister`], but an unknown identifier is an error.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchboardError::NotFound`] when no such agent exists, or
    /// [`SwitchboardError::Store`] when persistence fails.
    pub async fn unregister_required(&self, id: AgentId) -> SwitchboardResult<()> {
        if self.unregister(id).await? {
            Ok(())
        } else {
            Err(SwitchboardError::NotFound(id))
        }
    }

    /// Looks up agent `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchboardError::Store`] when the registry cannot be read.
    pub async fn fetch(&self, id: AgentId) -> SwitchboardResult<Option<AgentRecord>> {
        Ok(self.store.get(id).await?)
    }

    /// Like [`Self::fetch`], but an unknown identifier is an error.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchboardError::NotFound`] when no such agent exists, or
    /// [`SwitchboardError::Store`] when the registry cannot be read.
    pub async fn fetch_required(&self, id: AgentId) -> SwitchboardResult<AgentRecord> {
        self.fetch(id).await?.ok_or(SwitchboardError::NotFound(id))
    }

    /// Returns every registered agent in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchboardError::Store`] when the registry cannot be read.
    pub async fn enumerate(&self) -> SwitchboardResult<Vec<AgentRecord>> {
        Ok(self.store.list().await?)
    }

    /// Selects an agent for `request` and dispatches its original text.
    ///
    /// Returns the no-match message when no agent fits. Agent failures are
    /// folded into the returned string.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchboardError::Store`] when the registry cannot be read.
    pub async fn route(&self, request: &AnalyzedRequest) -> SwitchboardResult<String> {
        let agents = self.store.list().await?;
        let Some(agent) = self.selector.select(&agents, request.tokens()) else {
            tracing::debug!(tokens = request.tokens().len(), "no agent matched request");
            return Ok(NO_MATCH.to_owned());
        };
        tracing::debug!(agent_id = %agent.id(), kind = %agent.kind(), "selected agent");
        Ok(self.dispatcher.dispatch(agent, request.original()).await)
    }

    /// Tokenizes `text` and routes it.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchboardError::Store`] when the registry cannot be read.
    pub async fn route_text(&self, text: &str) -> SwitchboardResult<String> {
        let request = self.tokenizer.analyze(text);
        self.route(&request).await
    }
}
