//! Domain model for agent invocation outcomes.

mod error;
mod shell_mode;

pub use error::{InvocationError, NO_OUTPUT};
pub(crate) use error::error_chain;
pub use shell_mode::ShellMode;
