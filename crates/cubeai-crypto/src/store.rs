//! File-backed secure preference store.

use crate::{Error, Result, SessionCipher};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Encrypted key-value store persisted as a JSON file.
///
/// With a cipher, values are stored in the `iv_b64:ct_b64` format; reads
/// transparently handle legacy zero-IV values and plaintext entries
/// written before a session key existed. Without a cipher the store
/// degrades to plaintext JSON — logged, deliberate, keeps preferences
/// available when no session key can be obtained.
pub struct SecureStore {
    path: PathBuf,
    cipher: Option<SessionCipher>,
    entries: BTreeMap<String, String>,
}

impl SecureStore {
    /// Open (or create) a store at `path`.
    pub fn open(path: impl Into<PathBuf>, cipher: Option<SessionCipher>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        if cipher.is_none() {
            warn!(
                path = %path.display(),
                "no session key available; preferences will be stored as plaintext"
            );
        }
        Ok(Self {
            path,
            cipher,
            entries,
        })
    }

    /// Open the store at the default per-user location.
    pub fn open_default(cipher: Option<SessionCipher>) -> Result<Self> {
        Self::open(Self::default_path()?, cipher)
    }

    /// Default store path under the per-user data directory.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::data_dir().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "could not determine user data directory",
            ))
        })?;
        Ok(base.join("cubeai").join("preferences.json"))
    }

    /// Path this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether values are being encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.cipher.is_some()
    }

    /// Serialize and store a value under `key`.
    pub fn save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        let stored = match &self.cipher {
            Some(cipher) => cipher.encrypt(&json),
            None => json,
        };
        self.entries.insert(key.to_string(), stored);
        self.persist()
    }

    /// Fetch and deserialize the value under `key`, if present.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(stored) = self.entries.get(key) else {
            return Ok(None);
        };

        let json = match &self.cipher {
            Some(cipher) => match cipher.decrypt(stored) {
                Ok(json) => json,
                Err(e) => {
                    // The entry may predate the session key. Try it as
                    // plaintext before giving up.
                    if serde_json::from_str::<T>(stored).is_ok() {
                        debug!(key, "read plaintext entry from encrypted store");
                        stored.clone()
                    } else {
                        return Err(e);
                    }
                }
            },
            None => stored.clone(),
        };

        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Remove the value under `key`. Returns whether it existed.
    pub fn remove(&mut self, key: &str) -> Result<bool> {
        let existed = self.entries.remove(key).is_some();
        if existed {
            self.persist()?;
        }
        Ok(existed)
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
