//! Key/value storage on disk.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Local storage: one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    /// Open storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, key: &str) -> PathBuf {
        // Keep keys flat inside the storage directory
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }

    /// Read a value. Missing keys yield `Ok(None)`.
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let value = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read storage item: {}", path.display()))?;
        Ok(Some(value))
    }

    /// Write a value, replacing any previous one.
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create storage directory: {}", self.dir.display())
        })?;
        let path = self.item_path(key);
        fs::write(&path, value)
            .with_context(|| format!("Failed to write storage item: {}", path.display()))
    }
}
