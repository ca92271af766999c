//! Login exchange and durable storage for the session token.
//!
//! A `TokenStore` holds string values under fixed keys, the way a browser's
//! local storage would. The console only ever writes one key
//! (`stomaton_token`), but the stores are key-addressed so several entries
//! can share one backing file or keychain service.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use keyring::Entry;
use thiserror::Error;

use super::client::{ApiClient, ApiError};
use super::envelope_data;
use super::types::{LoginRequest, LoginResponse, StandardResponse};

/// Keychain service name for the console.
const SERVICE_NAME: &str = "com.stomaton.console";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Keychain operation failed: {0}")]
    Keychain(String),
    #[error("Storage file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Storage lock poisoned")]
    Poisoned,
}

impl From<keyring::Error> for StorageError {
    fn from(err: keyring::Error) -> Self {
        StorageError::Keychain(err.to_string())
    }
}

/// Key/value storage that survives process restarts.
pub trait TokenStore: Send + Sync {
    /// Read the value stored under `key`. `None` if never written or removed.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Idempotent.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Token store backed by the OS keychain (one entry per key).
pub struct KeychainTokenStore {
    service: String,
}

impl KeychainTokenStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }
}

impl Default for KeychainTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeychainTokenStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entry = Entry::new(&self.service, key)?;
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StorageError::from(e)),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let entry = Entry::new(&self.service, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let entry = Entry::new(&self.service, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // Already deleted
            Err(e) => Err(StorageError::from(e)),
        }
    }
}

/// Token store backed by a JSON object on disk (`{"key": "value", ...}`).
///
/// Every operation re-reads the file so separate processes see each
/// other's writes.
pub struct FileTokenStore {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Default location: `<config_dir>/stomaton/storage.json`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("stomaton")
            .join("storage.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Process-local store. Nothing survives a restart; used by tests and
/// `--store memory`.
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Exchange credentials for an access token.
///
/// POST /auth/login with `{email, password}`.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
    let request = LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    };
    let envelope: StandardResponse<LoginResponse> = client.post_json("/auth/login", &request).await?;
    envelope_data(envelope)
}
