use super::KeyValueStore;
use crate::error::{Result, SieveError};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File-backed key-value store: each key is a `{key}.json` file under `root`.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    ///
    /// Characters outside `[A-Za-z0-9._-]` are replaced with `_` so a key can
    /// never escape the root directory.
    pub fn item_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let safe = safe.trim_start_matches('.');
        let name = if safe.is_empty() { "_" } else { safe };
        self.root.join(format!("{}.json", name))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(SieveError::Io)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FsStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(SieveError::Io)?;
        Ok(Some(content))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        let target = self.item_path(key);

        // Atomic write
        let tmp = self.root.join(format!(".item-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, value).map_err(SieveError::Io)?;
        fs::rename(&tmp, target).map_err(SieveError::Io)?;

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.item_path(key);
        if path.exists() {
            fs::remove_file(path).map_err(SieveError::Io)?;
        }
        Ok(())
    }
}
