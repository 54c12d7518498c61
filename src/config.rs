//! Layered configuration.
//!
//! Values are resolved from built-in defaults, then an optional TOML file,
//! then `SWITCHYARD__*` environment variables with `__` separating nested
//! keys (for example `SWITCHYARD__DISPATCH__TIMEOUT_SECS=10`).

use std::collections::HashMap;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::dispatch::domain::ShellMode;

const ENV_PREFIX: &str = "SWITCHYARD";
const ENV_SEPARATOR: &str = "__";
const FALLBACK_DATA_DIR: &str = ".switchyard";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchyardConfig {
    /// Directory holding the registry document and the vault key.
    pub data_dir: Utf8PathBuf,
    /// Registry document file name inside `data_dir`.
    pub registry_file: String,
    /// Vault key file name inside `data_dir`.
    pub key_file: String,
    /// Agent invocation settings.
    pub dispatch: DispatchConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

impl SwitchyardConfig {
    /// Full path of the registry document.
    #[must_use]
    pub fn registry_path(&self) -> Utf8PathBuf {
        self.data_dir.join(&self.registry_file)
    }

    /// Full path of the vault key file.
    #[must_use]
    pub fn key_path(&self) -> Utf8PathBuf {
        self.data_dir.join(&self.key_file)
    }
}

impl Default for SwitchyardConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            registry_file: "agents.json".to_owned(),
            key_file: "vault.key".to_owned(),
            dispatch: DispatchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_data_dir() -> Utf8PathBuf {
    directories::ProjectDirs::from("", "", "switchyard")
        .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.data_dir().to_path_buf()).ok())
        .unwrap_or_else(|| Utf8PathBuf::from(FALLBACK_DATA_DIR))
}

/// Agent invocation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Per-invocation timeout in seconds.
    pub timeout_secs: u64,
    /// How shell command agents receive the request text.
    pub shell_mode: ShellMode,
}

impl DispatchConfig {
    /// Per-invocation timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            shell_mode: ShellMode::Shell,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

/// Builds a [`SwitchyardConfig`] from its layered sources.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<Utf8PathBuf>,
    environment: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Creates a loader reading defaults and the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required TOML file layer.
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Utf8Path>) -> Self {
        self.file = Some(path.as_ref().to_owned());
        self
    }

    /// Reads environment overrides from `variables` instead of the process
    /// environment.
    #[must_use]
    pub fn with_environment<I, K, V>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.environment = Some(
            variables
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    /// Resolves the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing or malformed, or a
    /// value cannot be deserialised.
    pub fn load(self) -> Result<SwitchyardConfig, ConfigError> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&SwitchyardConfig::default())?);
        if let Some(path) = &self.file {
            builder = builder.add_source(File::new(path.as_str(), FileFormat::Toml).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(self.environment),
        );
        let config: SwitchyardConfig = builder.build()?.try_deserialize()?;
        tracing::debug!(data_dir = %config.data_dir, "configuration resolved");
        Ok(config)
    }
}
