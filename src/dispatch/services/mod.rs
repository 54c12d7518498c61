//! Application services for agent invocation.

mod dispatcher;

pub use dispatcher::Dispatcher;
