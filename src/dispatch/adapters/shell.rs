//! Local command adapter.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::required_detail;
use crate::dispatch::{
    domain::{InvocationError, ShellMode},
    ports::AgentAdapter,
};
use crate::registry::domain::{AgentRecord, detail_keys};
use crate::shell::command_line;

/// Adapter for [`crate::registry::domain::AgentKind::ShellCommand`] agents.
///
/// Standard output is returned as-is on success. On a non-zero exit the
/// captured standard error becomes the failure message. The child is
/// killed if the invocation is dropped, which is how the dispatcher's
/// timeout reaches it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellCommandAdapter {
    mode: ShellMode,
}

impl ShellCommandAdapter {
    /// Creates an adapter running commands in `mode`.
    #[must_use]
    pub const fn new(mode: ShellMode) -> Self {
        Self { mode }
    }

    /// Returns the execution mode.
    #[must_use]
    pub const fn mode(&self) -> ShellMode {
        self.mode
    }

    fn build(&self, command: &str, input: &str) -> Result<Command, InvocationError> {
        match self.mode {
            ShellMode::Shell => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(command_line(command, input));
                Ok(cmd)
            }
            ShellMode::Argv => {
                let mut parts = command.split_whitespace();
                let program = parts
                    .next()
                    .ok_or_else(|| InvocationError::Shell("command is empty".to_owned()))?;
                let mut cmd = Command::new(program);
                cmd.args(parts).arg(input);
                Ok(cmd)
            }
        }
    }
}

#[async_trait]
impl AgentAdapter for ShellCommandAdapter {
    async fn invoke(&self, agent: &AgentRecord, input: &str) -> Result<String, InvocationError> {
        let command = required_detail(agent, detail_keys::COMMAND)?;
        let mut cmd = self.build(command, input)?;
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(agent_id = %agent.id(), mode = ?self.mode, "running shell command");
        let output = cmd
            .output()
            .await
            .map_err(|err| InvocationError::Shell(err.to_string()))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(InvocationError::Shell(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ))
        }
    }
}
