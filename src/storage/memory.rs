use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::Result;

use super::BlobStore;

/// In-memory blob store. Clones share the same underlying map, so a test can
/// keep a handle and inspect what the ledger persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    slots: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a single blob.
    pub fn with_blob(key: &str, blob: impl Into<String>) -> Self {
        let store = Self::new();
        store.slots.borrow_mut().insert(key.to_string(), blob.into());
        store
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key))
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }
}
