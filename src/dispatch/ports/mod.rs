//! Port contracts for agent invocation.

pub mod adapter;
pub mod handler;

pub use adapter::AgentAdapter;
pub use handler::{Handler, HandlerError, HandlerLoadError, HandlerLoader};
