//! Kind-to-adapter routing with a uniform timeout.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinError;

use crate::dispatch::{
    adapters::{HandlerAdapter, RemoteApiAdapter, ShellCommandAdapter},
    domain::{InvocationError, ShellMode},
    ports::{AgentAdapter, HandlerLoader},
};
use crate::registry::domain::{AgentKind, AgentRecord};

/// Invokes agents through the adapter registered for their kind.
///
/// Each invocation runs on its own task. When the timeout elapses the task
/// is aborted, which drops any child process or HTTP request it owns.
#[derive(Clone)]
pub struct Dispatcher {
    adapters: HashMap<AgentKind, Arc<dyn AgentAdapter>>,
    timeout: Duration,
}

impl Dispatcher {
    /// Creates a dispatcher with no adapters.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            adapters: HashMap::new(),
            timeout,
        }
    }

    /// Creates a dispatcher with an adapter for every kind.
    ///
    /// Script bots and custom handlers both resolve through `loader`.
    ///
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] when the HTTP client cannot be built.
    pub fn standard(
        timeout: Duration,
        shell_mode: ShellMode,
        loader: Arc<dyn HandlerLoader>,
    ) -> Result<Self, reqwest::Error> {
        let handlers: Arc<dyn AgentAdapter> = Arc::new(HandlerAdapter::new(loader));
        Ok(Self::new(timeout)
            .with_adapter(AgentKind::RemoteApi, Arc::new(RemoteApiAdapter::new(timeout)?))
            .with_adapter(
                AgentKind::ShellCommand,
                Arc::new(ShellCommandAdapter::new(shell_mode)),
            )
            .with_adapter(AgentKind::ScriptBot, Arc::clone(&handlers))
            .with_adapter(AgentKind::CustomHandler, handlers))
    }

    /// Registers `adapter` for `kind`, replacing any previous one.
    #[must_use]
    pub fn with_adapter(mut self, kind: AgentKind, adapter: Arc<dyn AgentAdapter>) -> Self {
        self.adapters.insert(kind, adapter);
        self
    }

    /// Returns the per-invocation timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Invokes `agent` with `input` and returns its output or the failure
    /// message. Never fails and never panics.
    pub async fn dispatch(&self, agent: &AgentRecord, input: &str) -> String {
        match self.try_dispatch(agent, input).await {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!(
                    agent_id = %agent.id(),
                    kind = %agent.kind(),
                    error = %err,
                    "agent invocation failed"
                );
                err.to_string()
            }
        }
    }

    /// Invokes `agent` with `input`, keeping the failure typed.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::MissingDetail`] when a required detail is
    /// absent, [`InvocationError::Unsupported`] when no adapter handles the
    /// kind, [`InvocationError::TimedOut`] when the timeout elapses,
    /// [`InvocationError::Aborted`] when the adapter panics, or the
    /// adapter's own error.
    pub async fn try_dispatch(
        &self,
        agent: &AgentRecord,
        input: &str,
    ) -> Result<String, InvocationError> {
        if let Some(&key) = agent.missing_required_details().first() {
            return Err(InvocationError::MissingDetail {
                agent: agent.name().to_string(),
                key,
            });
        }
        let adapter = self
            .adapters
            .get(&agent.kind())
            .cloned()
            .ok_or(InvocationError::Unsupported(agent.kind()))?;

        tracing::debug!(agent_id = %agent.id(), kind = %agent.kind(), "dispatching request");
        let owned_agent = agent.clone();
        let owned_input = input.to_owned();
        let mut task =
            tokio::spawn(async move { adapter.invoke(&owned_agent, &owned_input).await });

        match tokio::time::timeout(self.timeout, &mut task).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_error)) => Err(InvocationError::Aborted(abort_reason(join_error))),
            Err(_elapsed) => {
                task.abort();
                Err(InvocationError::TimedOut(self.timeout))
            }
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.adapters.keys().map(|kind| kind.as_str()).collect();
        kinds.sort_unstable();
        f.debug_struct("Dispatcher")
            .field("kinds", &kinds)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn abort_reason(err: JoinError) -> String {
    if err.is_panic() {
        panic_message(err.into_panic().as_ref())
    } else {
        err.to_string()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "adapter panicked".to_owned()
    }
}
