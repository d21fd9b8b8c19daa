//! Secure credential store.
//!
//! Values are held as [`SecretString`] in memory so they never show up in
//! `Debug` output or logs. The file-backed store persists them to an
//! owner-only JSON file.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use secrecy::{ExposeSecret, SecretString};

use super::{StorageError, read_json_file, write_json_file};

const CREDENTIALS_FILE: &str = "credentials.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKey {
    AccessToken,
    Nickname,
    ProfileImagePath,
}

pub const ALL_CREDENTIAL_KEYS: [CredentialKey; 3] = [
    CredentialKey::AccessToken,
    CredentialKey::Nickname,
    CredentialKey::ProfileImagePath,
];

impl CredentialKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKey::AccessToken => "accessToken",
            CredentialKey::Nickname => "nickname",
            CredentialKey::ProfileImagePath => "profileImagePath",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        ALL_CREDENTIAL_KEYS.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub trait CredentialStore: Send + Sync {
    fn get(&self, key: CredentialKey) -> Option<SecretString>;

    fn set(&self, key: CredentialKey, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: CredentialKey) -> Result<(), StorageError>;
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::from(secret.expose_secret().to_owned())
}

/// In-memory credential store, used by tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<CredentialKey, SecretString>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for MemoryCredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCredentialStore")
            .field("entries", &"[REDACTED]")
            .finish()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: CredentialKey) -> Option<SecretString> {
        self.entries.lock().get(&key).map(copy_secret)
    }

    fn set(&self, key: CredentialKey, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .insert(key, SecretString::from(value.to_owned()));
        Ok(())
    }

    fn remove(&self, key: CredentialKey) -> Result<(), StorageError> {
        self.entries.lock().remove(&key);
        Ok(())
    }
}

/// Credential store persisted to `credentials.json` in the data directory.
pub struct FileCredentialStore {
    path: PathBuf,
    entries: Mutex<HashMap<CredentialKey, SecretString>>,
}

impl FileCredentialStore {
    /// Open the store in `dir`, loading any existing credentials.
    ///
    /// Unknown keys in the file are dropped on the next write.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        let path = dir.join(CREDENTIALS_FILE);
        let raw = read_json_file(&path)?;

        let entries = raw
            .into_iter()
            .filter_map(|(k, v)| CredentialKey::parse(&k).map(|key| (key, SecretString::from(v))))
            .collect();

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<CredentialKey, SecretString>) -> Result<(), StorageError> {
        let raw: BTreeMap<String, String> = entries
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.expose_secret().to_owned()))
            .collect();
        write_json_file(&self.path, &raw, true)
    }
}

impl fmt::Debug for FileCredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileCredentialStore")
            .field("path", &self.path)
            .field("entries", &"[REDACTED]")
            .finish()
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: CredentialKey) -> Option<SecretString> {
        self.entries.lock().get(&key).map(copy_secret)
    }

    fn set(&self, key: CredentialKey, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        let mut next: HashMap<CredentialKey, SecretString> =
            entries.iter().map(|(k, v)| (*k, copy_secret(v))).collect();
        next.insert(key, SecretString::from(value.to_owned()));

        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: CredentialKey) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        if !entries.contains_key(&key) {
            return Ok(());
        }
        let next: HashMap<CredentialKey, SecretString> = entries
            .iter()
            .filter(|(k, _)| **k != key)
            .map(|(k, v)| (*k, copy_secret(v)))
            .collect();

        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryCredentialStore::new();
        assert!(store.get(CredentialKey::AccessToken).is_none());

        store.set(CredentialKey::AccessToken, "tok-123").unwrap();
        let token = store.get(CredentialKey::AccessToken).unwrap();
        assert_eq!(token.expose_secret(), "tok-123");

        store.remove(CredentialKey::AccessToken).unwrap();
        assert!(store.get(CredentialKey::AccessToken).is_none());
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileCredentialStore::open(dir.path()).unwrap();
            store.set(CredentialKey::AccessToken, "tok-abc").unwrap();
            store.set(CredentialKey::Nickname, "여행자").unwrap();
        }

        let store = FileCredentialStore::open(dir.path()).unwrap();
        assert_eq!(
            store.get(CredentialKey::AccessToken).unwrap().expose_secret(),
            "tok-abc"
        );
        assert_eq!(
            store.get(CredentialKey::Nickname).unwrap().expose_secret(),
            "여행자"
        );
        assert!(store.get(CredentialKey::ProfileImagePath).is_none());
    }

    #[test]
    fn test_file_store_remove_persists() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::open(dir.path()).unwrap();
        store.set(CredentialKey::AccessToken, "tok").unwrap();
        store.remove(CredentialKey::AccessToken).unwrap();

        let reopened = FileCredentialStore::open(dir.path()).unwrap();
        assert!(reopened.get(CredentialKey::AccessToken).is_none());
    }

    #[test]
    fn test_debug_redacts_values() {
        let store = MemoryCredentialStore::new();
        store.set(CredentialKey::AccessToken, "super-secret").unwrap();
        let debug = format!("{:?}", store);
        assert!(!debug.contains("super-secret"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_write_failure_is_reported() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::open(dir.path()).unwrap();
        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o500)).unwrap();

        let result = store.set(CredentialKey::AccessToken, "tok");

        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o700)).unwrap();
        // Root ignores directory permissions, so only assert when the write failed.
        if result.is_err() {
            assert!(store.get(CredentialKey::AccessToken).is_none());
        }
    }
}
