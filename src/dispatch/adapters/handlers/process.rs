//! Subprocess-isolated handlers.
//!
//! The handler path names an executable file. Its entry point is the
//! program itself: the request text is written to standard input and
//! standard output is the result.

use std::io;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use camino::Utf8PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};

use crate::dispatch::ports::{Handler, HandlerError, HandlerLoadError, HandlerLoader};

/// Loads executable files as handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessHandlerLoader;

impl ProcessHandlerLoader {
    /// Creates the loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HandlerLoader for ProcessHandlerLoader {
    async fn load(&self, path: &str) -> Result<Arc<dyn Handler>, HandlerLoadError> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(HandlerLoadError::NotFound(path.to_owned()));
            }
            Err(err) => return Err(HandlerLoadError::load(err)),
        };
        if !metadata.is_file() || !is_executable(&metadata) {
            return Err(HandlerLoadError::MissingEntryPoint(path.to_owned()));
        }
        Ok(Arc::new(ProcessHandler::new(path)))
    }
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    true
}

/// Runs one executable per request.
#[derive(Debug, Clone)]
pub struct ProcessHandler {
    program: Utf8PathBuf,
}

impl ProcessHandler {
    /// Creates a handler for `program`.
    #[must_use]
    pub fn new(program: impl Into<Utf8PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl Handler for ProcessHandler {
    async fn process(&self, input: &str) -> Result<String, HandlerError> {
        let mut child = Command::new(self.program.as_std_path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(HandlerError::runtime)?;

        let stdin = child.stdin.take();
        let (fed, collected) = tokio::join!(feed_input(stdin, input), child.wait_with_output());
        fed?;
        let output = collected.map_err(HandlerError::runtime)?;
        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = stderr.trim();
        Err(HandlerError::Failed(if message.is_empty() {
            format!("handler exited with {}", output.status)
        } else {
            message.to_owned()
        }))
    }
}

/// Writes `input` to the handler and closes its standard input.
///
/// Must run concurrently with output collection: a handler may fill its
/// stdout pipe before it reads anything.
async fn feed_input(stdin: Option<ChildStdin>, input: &str) -> Result<(), HandlerError> {
    let Some(mut pipe) = stdin else {
        return Ok(());
    };
    match pipe.write_all(input.as_bytes()).await {
        // The handler may exit without reading its input.
        Err(err) if err.kind() != io::ErrorKind::BrokenPipe => Err(HandlerError::runtime(err)),
        _ => Ok(()),
    }
}
