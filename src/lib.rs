//! Switchyard: a registry and router for heterogeneous agent backends.
//!
//! Operators register agents (remote HTTP APIs, local commands, loadable
//! handlers), each with a free-form description. Incoming request text is
//! tokenised, matched against those descriptions, and handed to the first
//! agent that fits. Whatever happens during invocation comes back as a
//! single result string.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types and validation with no infrastructure
//! - **Ports**: Trait interfaces for storage, ciphers and agent backends
//! - **Adapters**: Concrete implementations (JSON files, HTTP, processes)
//! - **Services**: Orchestration over ports
//!
//! # Modules
//!
//! - [`vault`]: Lazily keyed sealing of secret details
//! - [`registry`]: Durable agent records
//! - [`routing`]: Tokenisation and agent selection
//! - [`dispatch`]: Per-kind invocation with timeout and failure capture
//! - [`switchboard`]: The operations exposed to a transport layer
//! - [`config`]: Layered configuration
//! - [`telemetry`]: Tracing setup

pub mod config;
pub mod dispatch;
pub mod registry;
pub mod routing;
pub mod shell;
pub mod switchboard;
pub mod telemetry;
pub mod vault;
