use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use thiserror::Error;

use self::{file::FileStorage, memory::MemoryStorage};

pub mod file;
pub mod memory;

pub type GenericError = Box<dyn std::error::Error + Send + Sync>;

pub fn io_to_generic_error(error: std::io::Error) -> GenericError {
    Box::new(error)
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Unable to initialize storage: {0}")]
    UnableToInitializeStorage(GenericError),

    #[error("Unable to read slot: {0}")]
    UnableToReadSlot(GenericError),

    #[error("Unable to write slot: {0}")]
    UnableToWriteSlot(GenericError),

    #[error("Unable to encode slot contents: {0}")]
    UnableToEncodeSlot(serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, PartialEq)]
pub enum ReadBlobState {
    Found(Vec<u8>),
    NotFound,
}

/// Durable key-value storage. Each key holds one blob that is replaced as a whole.
pub trait Storage {
    fn read_blob(&self, key: &str) -> StorageResult<ReadBlobState>;
    fn write_blob(&mut self, key: &str, bytes: Vec<u8>) -> StorageResult<()>;

    // Called on start-up, should be idempotent
    fn init(&self) -> StorageResult<()>;
}

pub type SharedStorage = Arc<Mutex<dyn Storage + Send + Sync>>;

#[derive(Debug, Clone, PartialEq)]
pub enum StorageEngine {
    /// One JSON file per key inside the directory
    File(PathBuf),
    /// Lives as long as the process, used by tests and benchmarks
    Memory,
}

impl StorageEngine {
    pub fn create(&self) -> StorageResult<SharedStorage> {
        let storage: SharedStorage = match self {
            StorageEngine::File(base_path) => Arc::new(Mutex::new(FileStorage::new(base_path.clone()))),
            StorageEngine::Memory => Arc::new(Mutex::new(MemoryStorage::new())),
        };

        storage
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .init()?;

        Ok(storage)
    }
}
