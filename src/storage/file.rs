use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use ::anyhow::{Context, Result};

use crate::storage::interface;

/// Storage backed by a small JSON object on disk. The whole document is
/// rewritten on every change.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).with_context(|| {
                format!("malformed session file {}", self.path.display())
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Ok(BTreeMap::new())
            }
            Err(err) => Err(err).with_context(|| {
                format!("failed to read {}", self.path.display())
            }),
        }
    }

    fn store(&self, items: &BTreeMap<String, String>) -> Result<()> {
        if items.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Err(err) if err.kind() != ErrorKind::NotFound => Err(err)
                    .with_context(|| {
                        format!("failed to remove {}", self.path.display())
                    }),
                _ => Ok(()),
            };
        }

        let json = serde_json::to_vec_pretty(items)?;
        std::fs::write(&self.path, json).with_context(|| {
            format!("failed to write {}", self.path.display())
        })
    }
}

impl interface::SessionStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        self.store(&items)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.load()?;
        if items.remove(key).is_some() {
            self.store(&items)?;
        }
        Ok(())
    }

    fn get_name(&self) -> &str {
        "file"
    }
}
