//! Whole-document persistence: each collection is one JSON list stored under one key.
//!
//! Every write is a read-modify-write of the full list. Two writers racing on the
//! same key lose updates (last write wins); callers serialize access if that matters.

use crate::models::Wrestler;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

pub const TOURNAMENTS_KEY: &str = "tournaments";
pub const HISTORY_KEY: &str = "tournamentHistory";
pub const WRESTLERS_KEY: &str = "wrestlers";
pub const CHAMPIONSHIPS_KEY: &str = "championships";

/// Errors from reading or writing stored collections.
#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    /// A stored document is not valid JSON for its collection.
    Corrupt { key: String, source: serde_json::Error },
    Serialize(serde_json::Error),
    Csv(csv::Error),
    /// A lock around an in-memory store was poisoned.
    Poisoned,
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "Storage I/O error: {}", e),
            StorageError::Corrupt { key, source } => {
                write!(f, "Stored '{}' could not be read: {}", key, source)
            }
            StorageError::Serialize(e) => write!(f, "Could not serialize collection: {}", e),
            StorageError::Csv(e) => write!(f, "Invalid roster CSV: {}", e),
            StorageError::Poisoned => write!(f, "Store lock poisoned"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Corrupt { source, .. } => Some(source),
            StorageError::Serialize(e) => Some(e),
            StorageError::Csv(e) => Some(e),
            StorageError::Poisoned => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<csv::Error> for StorageError {
    fn from(e: csv::Error) -> Self {
        StorageError::Csv(e)
    }
}

/// A string key-value store holding serialized documents.
pub trait KeyValueStore {
    /// None if nothing has been stored under `key` yet.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Clone, Debug)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    /// Open (and create if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonDirStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // Write then rename so a crash mid-write never leaves a truncated document.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory store (tests, ephemeral runs).
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let g = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(g.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut g = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        g.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Load the list stored under `key`; empty if nothing is stored yet.
///
/// An unreadable document is an error rather than an empty list, so a following
/// save cannot silently replace data that failed to parse.
pub fn load_collection<T, S>(store: &S, key: &str) -> Result<Vec<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.read(key)? else {
        debug!("No stored '{}', starting empty", key);
        return Ok(Vec::new());
    };
    serde_json::from_str(&raw).map_err(|source| {
        warn!("Stored '{}' is not a valid collection: {}", key, source);
        StorageError::Corrupt {
            key: key.to_string(),
            source,
        }
    })
}

/// Replace the list stored under `key`.
pub fn save_collection<T, S>(store: &S, key: &str, items: &[T]) -> Result<(), StorageError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string_pretty(items).map_err(StorageError::Serialize)?;
    store.write(key, &raw)
}

#[derive(Deserialize)]
struct RosterRow {
    id: String,
    name: String,
}

/// Read wrestlers from CSV with an `id,name` header. Rows with a blank id or name are skipped.
pub fn import_roster_csv<R: io::Read>(reader: R) -> Result<Vec<Wrestler>, StorageError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut wrestlers = Vec::new();
    for (line, row) in rdr.deserialize::<RosterRow>().enumerate() {
        let row = row?;
        if row.id.is_empty() || row.name.is_empty() {
            warn!("Skipping roster row {}: id and name are required", line + 2);
            continue;
        }
        wrestlers.push(Wrestler::new(row.id, row.name));
    }
    Ok(wrestlers)
}
