//! JSON file-backed key-value substrate.
//!
//! One pretty-printed JSON file per collection key under a data directory.
//! Writes replace the whole collection; reads of a missing file yield the
//! collection's default. Single logical writer, last write wins.

use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Collection key for registered users.
pub const USERS_KEY: &str = "users";
/// Collection key for vitals records.
pub const RECORDS_KEY: &str = "records";
/// Collection key for the current session user.
pub const SESSION_KEY: &str = "session";

/// Directory of JSON collection files.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open the store, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Load a whole collection. A missing file reads as the default.
    pub fn load<T>(&self, key: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.file_path(key);
        if !path.exists() {
            return Ok(T::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Replace a whole collection on disk.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let path = self.file_path(key);
        let content = serde_json::to_string_pretty(value)?;
        fs::write(&path, content)?;
        debug!("wrote collection {:?}", path);
        Ok(())
    }

    /// Delete a collection file. Missing files are not an error.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.file_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}
