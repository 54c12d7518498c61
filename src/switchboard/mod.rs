//! Operator-facing surface over the registry, router and dispatcher.
//!
//! [`Switchboard`] is what a transport layer (HTTP routes, the CLI) talks
//! to. Registry failures come back as typed [`SwitchboardError`]s; agent
//! failures come back as result strings from [`Switchboard::route`].

mod bootstrap;
mod error;
mod request;
mod service;

pub use bootstrap::{BootstrapError, FileSwitchboard, InMemorySwitchboard, in_memory, open};
pub use error::{SwitchboardError, SwitchboardResult, ValidationError};
pub use request::RegisterAgentRequest;
pub use service::Switchboard;

#[cfg(test)]
mod tests;
