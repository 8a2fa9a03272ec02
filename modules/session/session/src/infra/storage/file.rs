//! File-backed persistence: one plain-text file per key inside a directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use session_sdk::{StorageError, TokenPersistence};
use tracing::debug;

/// Directory name under the platform config dir.
pub const DEFAULT_DIR_NAME: &str = "clinic-session";

#[derive(Debug, Clone)]
pub struct FileTokenPersistence {
    dir: PathBuf,
}

impl FileTokenPersistence {
    /// Persist under `dir`, created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persist under the platform config directory, e.g.
    /// `~/.config/clinic-session` on Linux.
    ///
    /// # Errors
    ///
    /// `Unavailable` if the platform has no config directory.
    pub fn in_default_location() -> Result<Self, StorageError> {
        dirs::config_dir()
            .map(|base| Self::new(base.join(DEFAULT_DIR_NAME)))
            .ok_or_else(|| StorageError::Unavailable("no config directory on this platform".to_owned()))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(key))
    }
}

impl TokenPersistence for FileTokenPersistence {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents.trim_end_matches(['\r', '\n']).to_owned())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        // Write next to the target and rename so readers never see a partial token.
        let staging = self.dir.join(format!("{key}.tmp"));
        let mut file = open_private(&staging)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&staging, &path)?;

        debug!(path = %path.display(), "Credential written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
