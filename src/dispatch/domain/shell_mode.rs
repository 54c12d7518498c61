//! How shell command agents receive the request text.

use serde::{Deserialize, Serialize};

/// Execution mode for shell command agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellMode {
    /// Run `sh -c "<command> '<text>'"` with the text single-quote escaped.
    #[default]
    Shell,
    /// Split the command on whitespace and pass the text as one extra
    /// argument, without a shell.
    Argv,
}
