//! Loader that tries several loaders in order.

use std::sync::Arc;

use async_trait::async_trait;

use crate::dispatch::ports::{Handler, HandlerLoadError, HandlerLoader};

/// Tries each loader in turn, moving on only when one reports
/// [`HandlerLoadError::NotFound`].
#[derive(Clone, Default)]
pub struct ChainedHandlerLoader {
    loaders: Vec<Arc<dyn HandlerLoader>>,
}

impl ChainedHandlerLoader {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `loader` to the chain.
    #[must_use]
    pub fn then(mut self, loader: Arc<dyn HandlerLoader>) -> Self {
        self.loaders.push(loader);
        self
    }
}

#[async_trait]
impl HandlerLoader for ChainedHandlerLoader {
    async fn load(&self, path: &str) -> Result<Arc<dyn Handler>, HandlerLoadError> {
        for loader in &self.loaders {
            match loader.load(path).await {
                Err(HandlerLoadError::NotFound(_)) => {}
                outcome => return outcome,
            }
        }
        Err(HandlerLoadError::NotFound(path.to_owned()))
    }
}
