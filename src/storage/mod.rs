//! Local key-value stores: the secure credential store and user preferences.
//!
//! Both stores keep a small JSON object on disk and mirror it in memory.
//! Writes go through [`write_json_file`], which writes a sibling temp file and
//! renames it into place so a crash never leaves a half-written store.

pub mod credentials;
pub mod preferences;

pub use credentials::{
    CredentialKey, CredentialStore, FileCredentialStore, MemoryCredentialStore,
};
pub use preferences::{FilePreferences, MemoryPreferences, PreferenceKey, Preferences};

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure writing or reading one of the local stores.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt store at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read a flat string map. A missing file is an empty map.
pub(crate) fn read_json_file(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(StorageError::io(path, e)),
    };

    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Atomically replace `path` with the serialized map.
///
/// With `private` set the file is created readable by the owner only (Unix).
pub(crate) fn write_json_file(
    path: &Path,
    entries: &BTreeMap<String, String>,
    private: bool,
) -> Result<(), StorageError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }

    let json = serde_json::to_string_pretty(entries).map_err(|source| StorageError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp_path = path.with_extension("json.tmp");
    {
        let mut file = open_for_write(&tmp_path, private).map_err(|e| StorageError::io(&tmp_path, e))?;
        file.write_all(json.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| StorageError::io(&tmp_path, e))?;
    }

    fs::rename(&tmp_path, path).map_err(|e| StorageError::io(path, e))
}

#[cfg(unix)]
fn open_for_write(path: &Path, private: bool) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = fs::OpenOptions::new();
    options.create(true).write(true).truncate(true);
    if private {
        options.mode(0o600);
    }
    options.open(path)
}

#[cfg(not(unix))]
fn open_for_write(path: &Path, _private: bool) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
}
