//! Agent registry: durable records of registered agent backends.
//!
//! Each record names an agent, fixes its [`domain::AgentKind`] at creation,
//! and carries an open set of string details. Secret details are sealed by
//! the credential vault before they are written and opened again on every
//! read, so callers only ever see plaintext.
//!
//! Every mutation is a whole-snapshot read-modify-write. Within a process a
//! single-writer guard serialises mutations; across processes a revision
//! counter rejects a save whose snapshot has gone stale.
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
