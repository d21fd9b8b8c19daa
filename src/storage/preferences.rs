//! Plain local preferences: cached user id and onboarding answers.
//!
//! Unlike the credential store, writes never fail the caller. A failed write
//! is logged and the in-memory value still takes effect for this session.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::{StorageError, read_json_file, write_json_file};

const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    UserId,
    Nickname,
    ProfileImagePath,
    /// Personality title chosen during onboarding
    Personality,
}

impl PreferenceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::UserId => "userID",
            PreferenceKey::Nickname => "nickname",
            PreferenceKey::ProfileImagePath => "profileImagePath",
            PreferenceKey::Personality => "personality",
        }
    }
}

pub trait Preferences: Send + Sync {
    fn get(&self, key: PreferenceKey) -> Option<String>;

    fn set(&self, key: PreferenceKey, value: &str);
}

#[derive(Debug, Default)]
pub struct MemoryPreferences {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Preferences for MemoryPreferences {
    fn get(&self, key: PreferenceKey) -> Option<String> {
        self.entries.lock().get(key.as_str()).cloned()
    }

    fn set(&self, key: PreferenceKey, value: &str) {
        self.entries
            .lock()
            .insert(key.as_str().to_string(), value.to_string());
    }
}

/// Preferences persisted to `preferences.json` in the data directory.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FilePreferences {
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        let path = dir.join(PREFERENCES_FILE);
        let entries = read_json_file(&path)?;
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Preferences for FilePreferences {
    fn get(&self, key: PreferenceKey) -> Option<String> {
        self.entries.lock().get(key.as_str()).cloned()
    }

    fn set(&self, key: PreferenceKey, value: &str) {
        let mut entries = self.entries.lock();
        entries.insert(key.as_str().to_string(), value.to_string());
        if let Err(e) = write_json_file(&self.path, &entries, false) {
            tracing::warn!("Failed to persist preference '{}': {e}", key.as_str());
        }
    }
}
