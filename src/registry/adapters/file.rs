//! JSON file snapshot store.
//!
//! The registry lives in one pretty-printed JSON document inside the data
//! directory. Writes go to a sibling temp file that is synced and then
//! renamed over the target, so readers never observe a partial document.
//!
//! Documents without a version tag (a bare object keyed by agent id, each
//! entry holding `name`, `type` and `details`) are imported on read.

use std::collections::BTreeMap;
use std::io::{self, Write};

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::OpenOptions;
use cap_std::fs_utf8::Dir;
use serde::Deserialize;
use thiserror::Error;

use crate::registry::{
    domain::detail_keys,
    ports::{PersistedAgent, PersistedRegistry, SnapshotError, SnapshotResult, SnapshotStore},
};

/// Snapshot store persisting the registry to `<dir>/<file_name>`.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    dir: Utf8PathBuf,
    file_name: String,
}

impl JsonFileSnapshotStore {
    /// Creates a store for `file_name` inside `dir`.
    ///
    /// The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    /// Returns the full document path.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        self.dir.join(&self.file_name)
    }

    fn temp_file_name(&self) -> String {
        format!("{}.tmp", self.file_name)
    }
}

#[async_trait]
impl SnapshotStore for JsonFileSnapshotStore {
    async fn read(&self) -> SnapshotResult<Option<PersistedRegistry>> {
        let dir = self.dir.clone();
        let file_name = self.file_name.clone();
        run_blocking(move || read_document(&dir, &file_name)).await
    }

    async fn write(&self, registry: &PersistedRegistry) -> SnapshotResult<()> {
        let contents = serde_json::to_string_pretty(registry).map_err(SnapshotError::persistence)?;
        let dir = self.dir.clone();
        let file_name = self.file_name.clone();
        let temp_name = self.temp_file_name();
        run_blocking(move || write_document(&dir, &file_name, &temp_name, &contents)).await?;
        tracing::debug!(path = %self.path(), revision = registry.revision, "wrote registry document");
        Ok(())
    }
}

async fn run_blocking<T>(
    operation: impl FnOnce() -> SnapshotResult<T> + Send + 'static,
) -> SnapshotResult<T>
where
    T: Send + 'static,
{
    tokio::task::spawn_blocking(operation)
        .await
        .map_err(SnapshotError::persistence)?
}

fn read_document(
    dir_path: &Utf8Path,
    file_name: &str,
) -> SnapshotResult<Option<PersistedRegistry>> {
    let dir = match Dir::open_ambient_dir(dir_path, ambient_authority()) {
        Ok(dir) => dir,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(SnapshotError::persistence(err)),
    };
    let contents = match dir.read_to_string(file_name) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(SnapshotError::persistence(err)),
    };
    parse_document(&contents).map(Some)
}

fn write_document(
    dir_path: &Utf8Path,
    file_name: &str,
    temp_name: &str,
    contents: &str,
) -> SnapshotResult<()> {
    Dir::create_ambient_dir_all(dir_path, ambient_authority())
        .map_err(SnapshotError::persistence)?;
    let dir =
        Dir::open_ambient_dir(dir_path, ambient_authority()).map_err(SnapshotError::persistence)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    let mut temp = dir
        .open_with(temp_name, &options)
        .map_err(SnapshotError::persistence)?;
    temp.write_all(contents.as_bytes())
        .map_err(SnapshotError::persistence)?;
    temp.sync_all().map_err(SnapshotError::persistence)?;
    drop(temp);

    dir.rename(temp_name, &dir, file_name)
        .map_err(SnapshotError::persistence)
}

#[derive(Debug, Error)]
#[error("unsupported registry format version {0}")]
struct UnsupportedFormat(u32);

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDocument {
    Versioned(PersistedRegistry),
    Unversioned(BTreeMap<String, UnversionedAgent>),
}

#[derive(Deserialize)]
struct UnversionedAgent {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    details: BTreeMap<String, String>,
}

/// Unversioned documents used different spellings for two detail keys.
const RENAMED_KEYS: [(&str, &str); 2] = [
    ("api_key", detail_keys::CREDENTIAL),
    ("file_path", detail_keys::HANDLER_PATH),
];

fn parse_document(contents: &str) -> SnapshotResult<PersistedRegistry> {
    let document: StoredDocument =
        serde_json::from_str(contents).map_err(SnapshotError::corrupt)?;
    match document {
        StoredDocument::Versioned(registry) => {
            if registry.format_version > PersistedRegistry::CURRENT_FORMAT {
                return Err(SnapshotError::corrupt(UnsupportedFormat(
                    registry.format_version,
                )));
            }
            Ok(registry)
        }
        StoredDocument::Unversioned(entries) => {
            tracing::info!(
                agents = entries.len(),
                "importing unversioned registry document"
            );
            let agents = entries
                .into_iter()
                .map(|(id, entry)| import_unversioned(id, entry))
                .collect();
            Ok(PersistedRegistry::new(0, agents))
        }
    }
}

fn import_unversioned(id: String, entry: UnversionedAgent) -> PersistedAgent {
    let mut details = entry.details;
    for (old, new) in RENAMED_KEYS {
        if let Some(value) = details.remove(old) {
            details.entry(new.to_owned()).or_insert(value);
        }
    }
    PersistedAgent {
        id,
        name: entry.name,
        kind: entry.kind,
        details,
        created_at: None,
        updated_at: None,
    }
}
