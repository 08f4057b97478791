use std::collections::HashMap;

use super::{GenericError, ReadBlobState, Storage, StorageError, StorageResult};

/// In-process stand-in for durable storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: HashMap<String, Vec<u8>>,
    reject_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `bytes` already stored under `key`
    pub fn with_blob(key: &str, bytes: Vec<u8>) -> Self {
        let mut storage = Self::new();
        storage.blobs.insert(key.to_string(), bytes);
        storage
    }

    /// While set, every write fails the way a full disk or quota would
    pub fn set_reject_writes(&mut self, reject_writes: bool) {
        self.reject_writes = reject_writes;
    }

    pub fn blob(&self, key: &str) -> Option<&[u8]> {
        self.blobs.get(key).map(Vec::as_slice)
    }
}

impl Storage for MemoryStorage {
    fn read_blob(&self, key: &str) -> StorageResult<ReadBlobState> {
        match self.blobs.get(key) {
            Some(bytes) => Ok(ReadBlobState::Found(bytes.clone())),
            None => Ok(ReadBlobState::NotFound),
        }
    }

    fn write_blob(&mut self, key: &str, bytes: Vec<u8>) -> StorageResult<()> {
        if self.reject_writes {
            return Err(StorageError::UnableToWriteSlot(GenericError::from(
                "memory storage is rejecting writes",
            )));
        }

        self.blobs.insert(key.to_string(), bytes);

        Ok(())
    }

    fn init(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_write_keeps_previous_blob() {
        let mut storage = MemoryStorage::with_blob("persons", b"[]".to_vec());
        storage.set_reject_writes(true);

        let result = storage.write_blob("persons", b"[1]".to_vec());

        assert!(matches!(result, Err(StorageError::UnableToWriteSlot(_))));
        assert_eq!(storage.blob("persons"), Some(&b"[]"[..]));
    }
}
