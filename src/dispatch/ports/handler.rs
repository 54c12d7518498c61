//! Handler capability and the loader that resolves it from a path.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Externally provided code that turns request text into output text.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Processes `input`.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when the handler fails.
    async fn process(&self, input: &str) -> Result<String, HandlerError>;
}

/// Resolves a handler reference (usually a filesystem path) to a
/// [`Handler`].
#[async_trait]
pub trait HandlerLoader: Send + Sync {
    /// Loads the handler named by `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerLoadError::NotFound`] when nothing answers to
    /// `path`, [`HandlerLoadError::MissingEntryPoint`] when something does
    /// but cannot be invoked, or [`HandlerLoadError::Load`] otherwise.
    async fn load(&self, path: &str) -> Result<Arc<dyn Handler>, HandlerLoadError>;
}

/// Errors raised while resolving a handler.
#[derive(Debug, Clone, Error)]
pub enum HandlerLoadError {
    /// No handler exists at the path.
    #[error("handler not found: {0}")]
    NotFound(String),

    /// The path exists but exposes no entry point.
    #[error("handler '{0}' does not provide an entry point")]
    MissingEntryPoint(String),

    /// Resolution failed for another reason.
    #[error("failed to load handler: {0}")]
    Load(Arc<dyn std::error::Error + Send + Sync>),
}

impl HandlerLoadError {
    /// Wraps a loader failure.
    pub fn load(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Load(Arc::new(err))
    }
}

/// Errors raised by a running handler.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    /// The handler reported a failure.
    #[error("{0}")]
    Failed(String),

    /// Executing the handler failed.
    #[error(transparent)]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    /// Wraps an execution failure.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
