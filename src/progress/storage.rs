//! Where saved progress lives. A store holds one text blob per key and
//! knows nothing about what is in it.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(error) => write!(f, "storage unavailable: {}", error),
            StorageError::Json(error) => write!(f, "saved progress is malformed: {}", error),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(error) => Some(error),
            StorageError::Json(error) => Some(error),
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        StorageError::Io(error)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        StorageError::Json(error)
    }
}

pub trait Storage {
    /// The blob saved under this key, if there is one.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StorageError>;

    /// Forget the blob under this key. Removing a key that was never saved
    /// is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// The storage key for a page: the prefix followed by the last component
/// of the page's location, or `index` when the location ends in a slash.
pub fn storage_key(location: &str, prefix: &str) -> String {
    let name = location
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("");

    if name.is_empty() {
        format!("{}index", prefix)
    } else {
        format!("{}{}", prefix, name)
    }
}

/// One JSON file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    pub fn new(directory: impl Into<PathBuf>) -> FileStorage {
        FileStorage {
            directory: directory.into(),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.directory
            .join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No saved progress");
                Ok(None)
            }
            Err(error) => Err(StorageError::Io(error)),
        }
    }

    /// Written to a temporary file first and then renamed over the old
    /// blob, so an interrupted save leaves the previous progress intact.
    fn save(&mut self, key: &str, blob: &str) -> Result<(), StorageError> {
        let path = self.path(key);
        let temp = path.with_extension("json.tmp");

        fs::create_dir_all(&self.directory)?;

        let file = File::create(&temp)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(blob.as_bytes())?;
        writer.flush()?;

        fs::rename(&temp, &path)?;

        debug!(path = %path.display(), "Saved progress");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(StorageError::Io(error)),
        }
    }
}

/// Read the blob under the key and parse it as JSON.
pub fn read_json<T: DeserializeOwned>(
    storage: &impl Storage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match storage.load(key)? {
        Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
        None => Ok(None),
    }
}

pub fn write_json<T: Serialize>(
    storage: &mut impl Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let blob = serde_json::to_string(value)?;
    storage.save(key, &blob)
}

/// Blobs held in memory, for tests and for rendering without a state
/// directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        MemoryStorage::default()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .get(key)
            .cloned())
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StorageError> {
        self.entries
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries
            .remove(key);
        Ok(())
    }
}
