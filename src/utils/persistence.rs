//! Key-value persistence for walk progress, characters and inventory.
//!
//! Every service reads and writes through a shared [`KeyValueStore`]. Values are
//! JSON strings; [`load_json_or_default`] and [`save_json`] wrap the
//! encode/decode boilerplate.
//!
//! [`FileStore`] keeps the whole map in one checksummed binary file:
//! - Magic (8 bytes)
//! - Data length (4 bytes)
//! - bincode-encoded `BTreeMap<String, String>` (variable length)
//! - SHA256 checksum over the three fields above (32 bytes)

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// "WALKQST1" in little-endian bytes.
pub const STORE_MAGIC: u64 = 0x3154_5351_4B4C_4157;

/// Environment variable overriding the default store location.
pub const SAVE_PATH_ENV: &str = "WALKQUEST_SAVE";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode store: {0}")]
    Encode(#[from] bincode::Error),

    #[error("failed to (de)serialize value: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid store magic: expected 0x{expected:016X}, got 0x{found:016X}")]
    BadMagic { expected: u64, found: u64 },

    #[error("store checksum verification failed")]
    ChecksumMismatch,

    #[error("could not determine a data directory")]
    NoDataDir,
}

/// Durable, process-wide string storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Non-persistent store for tests and simulations.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.remove(key);
        Ok(())
    }
}

/// File-backed store. The full map is cached in memory and rewritten on every
/// mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens (or creates) the store at `path`.
    ///
    /// A missing file yields an empty store. A corrupt file is an error so the
    /// caller can decide whether to discard it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let values = if path.exists() {
            read_store_file(&path)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        write_store_file(&self.path, values)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        if values.remove(key).is_some() {
            self.flush(&values)?;
        }
        Ok(())
    }
}

/// Resolves the store path: `$WALKQUEST_SAVE` first, then the platform data dir.
pub fn default_store_path() -> Result<PathBuf, StorageError> {
    if let Ok(path) = std::env::var(SAVE_PATH_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    let dirs = ProjectDirs::from("", "", "walkquest").ok_or(StorageError::NoDataDir)?;
    Ok(dirs.data_dir().join("walkquest.dat"))
}

fn checksum(magic: &[u8], len: &[u8], data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(magic);
    hasher.update(len);
    hasher.update(data);
    hasher.finalize().to_vec()
}

fn write_store_file(path: &Path, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
    let data = bincode::serialize(values)?;
    let magic = STORE_MAGIC.to_le_bytes();
    let len = (data.len() as u32).to_le_bytes();
    let sum = checksum(&magic, &len, &data);

    // Write to a sibling file first so a crash mid-write keeps the old store.
    let tmp = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&magic)?;
        file.write_all(&len)?;
        file.write_all(&data)?;
        file.write_all(&sum)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn read_store_file(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
    let mut file = fs::File::open(path)?;

    let mut magic = [0u8; 8];
    file.read_exact(&mut magic)?;
    let found = u64::from_le_bytes(magic);
    if found != STORE_MAGIC {
        return Err(StorageError::BadMagic {
            expected: STORE_MAGIC,
            found,
        });
    }

    let mut len = [0u8; 4];
    file.read_exact(&mut len)?;
    let mut data = vec![0u8; u32::from_le_bytes(len) as usize];
    file.read_exact(&mut data)?;

    let mut stored = [0u8; 32];
    file.read_exact(&mut stored)?;
    if stored.as_slice() != checksum(&magic, &len, &data).as_slice() {
        return Err(StorageError::ChecksumMismatch);
    }

    Ok(bincode::deserialize(&data)?)
}

/// Reads a JSON value, returning `T::default()` if it is missing or invalid.
pub fn load_json_or_default<T: Default + DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> T {
    load_json(store, key).unwrap_or_default()
}

/// Reads a JSON value. `None` if missing, unreadable or unparsable.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    match store.get(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unparsable stored value");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored value");
            None
        }
    }
}

/// Writes a value as JSON.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// Writes a value as JSON, logging instead of failing. In-memory state is
/// expected to advance regardless.
pub fn save_json_logged<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    if let Err(e) = save_json(store, key, value) {
        tracing::warn!(key, error = %e, "failed to persist value");
    }
}
