//! Agent invocation.
//!
//! The [`services::Dispatcher`] picks the [`ports::AgentAdapter`] registered
//! for an agent's kind, runs it under a uniform timeout on its own task,
//! and flattens every outcome into a single result string. Failures never
//! escape as errors or panics from [`services::Dispatcher::dispatch`].
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
