//! Handler loader implementations.

mod chain;
mod process;
mod registry;

pub use chain::ChainedHandlerLoader;
pub use process::{ProcessHandler, ProcessHandlerLoader};
pub use registry::{FnHandler, StaticHandlerLoader};
