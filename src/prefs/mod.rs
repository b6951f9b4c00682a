//! Persisted user preferences (the host's "browser storage").
//!
//! Holds the small set of string values that must survive a reload:
//! the post-login referrer, theme preferences, the auto-login marker,
//! and the current session token.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{PorticoError, Result};

/// Key for the path a user tried to visit before being sent to log in.
pub const REFERRER_KEY: &str = "referrer";
/// Key for the stringified dark-mode preference.
pub const DARK_MODE_KEY: &str = "darkMode";
/// Key for the stringified high-contrast preference.
pub const HIGH_CONTRAST_MODE_KEY: &str = "highContrastMode";
/// Key marking that the active session was established via silent auto-login.
pub const AUTO_LOGIN_KEY: &str = "autoLogin";
/// Key for the persisted session token.
pub const TOKEN_KEY: &str = "token";

/// Storage abstraction for persisted preference strings.
///
/// Booleans are stored stringified (`"true"` / `"false"`).
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);

    /// Read a stringified boolean, defaulting to `false` when absent.
    fn get_bool(&self, key: &str) -> bool {
        self.get(key).as_deref() == Some("true")
    }

    /// Store a stringified boolean.
    fn set_bool(&self, key: &str, value: bool) {
        self.set(key, if value { "true" } else { "false" });
    }
}

/// In-memory preference store.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.write() {
            values.remove(key);
        }
    }
}

/// File-backed preference store using a single JSON document.
///
/// A missing file reads as an empty store; writes create the parent
/// directory as needed. Write failures are logged and the in-memory copy
/// stays authoritative for the rest of the process.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: RwLock<HashMap<String, String>>,
}

impl FilePreferenceStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let values = Self::read_file(&path)?;
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Create a store at the default location under the user's home.
    pub fn new_default() -> Result<Self> {
        Self::new(default_prefs_path())
    }

    fn read_file(path: &Path) -> Result<HashMap<String, String>> {
        let raw = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(err) => return Err(PorticoError::Io(err)),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    fn flush(&self, values: &HashMap<String, String>) {
        let write = || -> Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let serialized = serde_json::to_string_pretty(values)?;
            fs::write(&self.path, serialized)?;
            Ok(())
        };
        if let Err(err) = write() {
            tracing::error!(path = %self.path.display(), error = %err, "failed to persist preferences");
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value.to_string());
            self.flush(&values);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.write() {
            values.remove(key);
            self.flush(&values);
        }
    }
}

fn default_prefs_path() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".portico").join("preferences.json"))
        .unwrap_or_else(|| PathBuf::from(".portico/preferences.json"))
}
