use std::path::PathBuf;

use crate::{consts::consts::PERSONS_SLOT, persistence::storage::StorageEngine};

#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub restore: bool,
    pub storage_engine: StorageEngine,
    pub slot_key: String,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl DatabaseOptions {
    /// Defines whether the person list is loaded from the durable slot on startup.
    /// When off the store starts empty and the first mutation overwrites the slot.
    pub fn set_restore(mut self, restore: bool) -> Self {
        self.restore = restore;
        self
    }

    pub fn set_storage_engine(mut self, storage_engine: StorageEngine) -> Self {
        self.storage_engine = storage_engine;
        self
    }
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        // Defaults to $CWD/data
        Self {
            storage_engine: StorageEngine::File(PathBuf::from("data")),
            restore: true,
            slot_key: PERSONS_SLOT.to_string(),
        }
    }
}

#[cfg(test)]
impl DatabaseOptions {
    pub fn new_test() -> Self {
        DatabaseOptions::default().set_storage_engine(StorageEngine::Memory)
    }
}

impl DatabaseOptions {
    pub fn new_benchmark() -> Self {
        DatabaseOptions::default()
            .set_storage_engine(StorageEngine::Memory)
            .set_restore(false)
    }
}
