//! File-backed key store.
//!
//! The key lives in a single file inside the data directory. It is created
//! with `create_new` semantics so two processes racing to initialise the
//! vault cannot overwrite each other's key; the loser loads the winner's.

use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::OpenOptions;
use cap_std::fs_utf8::Dir;

use crate::vault::{
    domain::VaultKey,
    ports::{KeyStore, KeyStoreError, KeyStoreResult},
};

/// Key store persisting the vault key to `<dir>/<file_name>`.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    dir: Utf8PathBuf,
    file_name: String,
}

impl FileKeyStore {
    /// Creates a key store for `file_name` inside `dir`.
    ///
    /// Nothing is touched on disk until the key is first loaded or created.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    /// Returns the directory holding the key file.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Returns the full key file path.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        self.dir.join(&self.file_name)
    }
}

impl KeyStore for FileKeyStore {
    fn load(&self) -> KeyStoreResult<Option<VaultKey>> {
        let dir = match Dir::open_ambient_dir(&self.dir, ambient_authority()) {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(KeyStoreError::io(err)),
        };
        let contents = match dir.read_to_string(&self.file_name) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(KeyStoreError::io(err)),
        };
        VaultKey::decode(&contents)
            .map(Some)
            .map_err(|err| KeyStoreError::Malformed(err.to_string()))
    }

    fn create(&self, key: &VaultKey) -> KeyStoreResult<()> {
        Dir::create_ambient_dir_all(&self.dir, ambient_authority()).map_err(KeyStoreError::io)?;
        let dir = Dir::open_ambient_dir(&self.dir, ambient_authority()).map_err(KeyStoreError::io)?;

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        let opened = match dir.open_with(&self.file_name, &options) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                return Err(KeyStoreError::AlreadyExists);
            }
            Err(err) => return Err(KeyStoreError::io(err)),
        };

        let mut file = opened.into_std();
        restrict_to_owner(&file).map_err(KeyStoreError::io)?;
        file.write_all(key.encode().as_bytes())
            .map_err(KeyStoreError::io)?;
        file.sync_all().map_err(KeyStoreError::io)?;
        tracing::info!(path = %self.path(), "created vault key file");
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_to_owner(file: &std::fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_to_owner(_file: &std::fs::File) -> io::Result<()> {
    Ok(())
}
