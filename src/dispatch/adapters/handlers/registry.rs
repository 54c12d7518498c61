//! In-process handler registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::dispatch::ports::{Handler, HandlerError, HandlerLoadError, HandlerLoader};

/// Adapts a synchronous closure into a [`Handler`].
pub struct FnHandler<F> {
    function: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&str) -> Result<String, HandlerError> + Send + Sync,
{
    /// Wraps `function`.
    #[must_use]
    pub const fn new(function: F) -> Self {
        Self { function }
    }
}

#[async_trait]
impl<F> Handler for FnHandler<F>
where
    F: Fn(&str) -> Result<String, HandlerError> + Send + Sync,
{
    async fn process(&self, input: &str) -> Result<String, HandlerError> {
        (self.function)(input)
    }
}

/// Resolves handler paths against a fixed table of in-process handlers.
#[derive(Clone, Default)]
pub struct StaticHandlerLoader {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl StaticHandlerLoader {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `path`, replacing any previous entry.
    #[must_use]
    pub fn with_handler(mut self, path: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
        self.handlers.insert(path.into(), handler);
        self
    }

    /// Returns whether `path` is registered.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.handlers.contains_key(path)
    }
}

impl fmt::Debug for StaticHandlerLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        paths.sort_unstable();
        f.debug_struct("StaticHandlerLoader")
            .field("paths", &paths)
            .finish()
    }
}

#[async_trait]
impl HandlerLoader for StaticHandlerLoader {
    async fn load(&self, path: &str) -> Result<Arc<dyn Handler>, HandlerLoadError> {
        self.handlers
            .get(path)
            .cloned()
            .ok_or_else(|| HandlerLoadError::NotFound(path.to_owned()))
    }
}
