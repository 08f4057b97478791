use std::{
    fs::{self, File, OpenOptions},
    io::{Read, Write},
    path::PathBuf,
};

use super::{io_to_generic_error, ReadBlobState, Storage, StorageError, StorageResult};

pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn get_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }

    fn get_temporary_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json.tmp", key))
    }
}

impl Storage for FileStorage {
    fn read_blob(&self, key: &str) -> StorageResult<ReadBlobState> {
        let mut file = match File::open(self.get_path(key)) {
            Ok(file) => file,
            Err(err) => match err.kind() {
                std::io::ErrorKind::NotFound => return Ok(ReadBlobState::NotFound),
                _ => return Err(StorageError::UnableToReadSlot(io_to_generic_error(err))),
            },
        };

        let mut buf = Vec::new();

        file.read_to_end(&mut buf)
            .map_err(|e| StorageError::UnableToReadSlot(io_to_generic_error(e)))?;

        Ok(ReadBlobState::Found(buf))
    }

    // Written next to the slot and renamed over it, a crash mid-write leaves the old contents
    fn write_blob(&mut self, key: &str, bytes: Vec<u8>) -> StorageResult<()> {
        let temporary_path = self.get_temporary_path(key);

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temporary_path)
            .map_err(|e| StorageError::UnableToWriteSlot(io_to_generic_error(e)))?;

        file.write_all(&bytes)
            .map_err(|e| StorageError::UnableToWriteSlot(io_to_generic_error(e)))?;

        file.sync_all()
            .map_err(|e| StorageError::UnableToWriteSlot(io_to_generic_error(e)))?;

        fs::rename(&temporary_path, self.get_path(key))
            .map_err(|e| StorageError::UnableToWriteSlot(io_to_generic_error(e)))
    }

    fn init(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.base_path)
            .map_err(|e| StorageError::UnableToInitializeStorage(io_to_generic_error(e)))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn test_storage() -> FileStorage {
        let base_path: PathBuf = ["/", "tmp", "personstore", &Uuid::new_v4().to_string()]
            .iter()
            .collect();

        let storage = FileStorage::new(base_path);
        storage.init().expect("should create the test directory");
        storage
    }

    #[test]
    fn missing_key_is_not_found() {
        let storage = test_storage();

        assert_eq!(storage.read_blob("persons").unwrap(), ReadBlobState::NotFound);
    }

    #[test]
    fn write_then_read_returns_the_same_bytes() {
        let mut storage = test_storage();

        storage.write_blob("persons", b"[1,2,3]".to_vec()).unwrap();

        assert_eq!(
            storage.read_blob("persons").unwrap(),
            ReadBlobState::Found(b"[1,2,3]".to_vec())
        );
        assert!(!storage.get_temporary_path("persons").exists());
    }

    #[test]
    fn shorter_write_replaces_longer_contents() {
        let mut storage = test_storage();

        storage
            .write_blob("persons", b"[1,2,3,4,5,6]".to_vec())
            .unwrap();
        storage.write_blob("persons", b"[]".to_vec()).unwrap();

        assert_eq!(
            storage.read_blob("persons").unwrap(),
            ReadBlobState::Found(b"[]".to_vec())
        );
    }

    #[test]
    fn init_is_idempotent() {
        let storage = test_storage();

        storage.init().unwrap();
        storage.init().unwrap();
    }
}
