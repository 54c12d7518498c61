//! Closed set of agent invocation strategies.

use super::{ParseAgentKindError, detail_keys};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Invocation strategy declared by an agent at registration.
///
/// The kind decides which detail keys are required before dispatch and
/// which of them are sealed at rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Signed HTTP POST to a remote endpoint.
    RemoteApi,
    /// Script handler loaded from a path.
    ScriptBot,
    /// Local command executed with the request text as its argument.
    ShellCommand,
    /// Operator-provided handler loaded from a path.
    CustomHandler,
}

impl AgentKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::RemoteApi,
        Self::ScriptBot,
        Self::ShellCommand,
        Self::CustomHandler,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RemoteApi => "remote_api",
            Self::ScriptBot => "script_bot",
            Self::ShellCommand => "shell_command",
            Self::CustomHandler => "custom_handler",
        }
    }

    /// Detail keys that must be present before the agent can be dispatched.
    #[must_use]
    pub const fn required_details(self) -> &'static [&'static str] {
        match self {
            Self::RemoteApi => &[detail_keys::CREDENTIAL, detail_keys::ENDPOINT],
            Self::ScriptBot | Self::CustomHandler => &[detail_keys::HANDLER_PATH],
            Self::ShellCommand => &[detail_keys::COMMAND],
        }
    }

    /// Detail keys sealed at rest.
    #[must_use]
    pub const fn secret_fields(self) -> &'static [&'static str] {
        match self {
            Self::RemoteApi => &[detail_keys::CREDENTIAL],
            Self::ScriptBot | Self::ShellCommand | Self::CustomHandler => &[],
        }
    }

    /// Returns whether `key` is sealed at rest for this kind.
    #[must_use]
    pub fn is_secret(self, key: &str) -> bool {
        self.secret_fields().contains(&key)
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentKind {
    type Error = ParseAgentKindError;

    /// Parses canonical names, their camel-case spellings, and the legacy
    /// labels `API`, `Bot`, `Local AI` and `Custom AI`.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "remoteapi" | "api" => Ok(Self::RemoteApi),
            "scriptbot" | "bot" => Ok(Self::ScriptBot),
            "shellcommand" | "localai" => Ok(Self::ShellCommand),
            "customhandler" | "customai" => Ok(Self::CustomHandler),
            _ => Err(ParseAgentKindError(value.to_owned())),
        }
    }
}

impl FromStr for AgentKind {
    type Err = ParseAgentKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}
