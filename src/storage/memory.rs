use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use ::anyhow::{anyhow, Result};

use crate::storage::interface;

/// Storage that lives as long as the process. Clones share the same map,
/// which lets tests rebuild an `App` against the storage of a previous one.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl interface::SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.lock().map_err(|_| anyhow!("storage poisoned"))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items =
            self.items.lock().map_err(|_| anyhow!("storage poisoned"))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items =
            self.items.lock().map_err(|_| anyhow!("storage poisoned"))?;
        items.remove(key);
        Ok(())
    }

    fn get_name(&self) -> &str {
        "memory"
    }
}
