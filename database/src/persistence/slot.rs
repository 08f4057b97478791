use std::sync::{MutexGuard, PoisonError};

use serde::{de::DeserializeOwned, Serialize};

use crate::model::person::Person;

use super::storage::{
    ReadBlobState, SharedStorage, Storage, StorageError, StorageResult,
};

/// JSON codec for the durable slot that mirrors the person list
pub struct PersonSlot {
    storage: SharedStorage,
    key: String,
}

impl PersonSlot {
    pub fn new(storage: SharedStorage, key: String) -> Self {
        Self { storage, key }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the stored person list. Missing, empty or unreadable contents give an
    /// empty list, start-up never fails because of what is in the slot.
    #[tracing::instrument(skip(self), fields(key = %self.key))]
    pub fn load(&self) -> Vec<Person> {
        match self.read_file::<Option<Vec<Person>>>() {
            Ok(Some(people)) => people,
            Ok(None) => vec![],
            Err(SlotReadError::Malformed { source, contents }) => {
                log::warn!(
                    "Ignoring {} malformed bytes in slot [{}], starting empty: {}",
                    contents.len(),
                    self.key,
                    source
                );
                self.keep_backup(contents);
                vec![]
            }
            Err(err) => {
                log::warn!(
                    "Ignoring stored people in slot [{}], starting empty: {}",
                    self.key,
                    err
                );
                vec![]
            }
        }
    }

    /// Overwrites the slot with the whole list
    #[tracing::instrument(skip(self, people), fields(key = %self.key, count = people.len()))]
    pub fn save(&self, people: &[Person]) -> StorageResult<()> {
        self.write_file(people)
    }

    /// Unreadable contents go to `<key>.bak`, the next save overwrites the slot itself
    fn keep_backup(&self, contents: Vec<u8>) {
        let backup_key = format!("{}.bak", self.key);

        match self.lock().write_blob(&backup_key, contents) {
            Ok(()) => log::warn!("Unreadable people kept in slot [{}]", backup_key),
            Err(err) => log::error!("Unable to back up slot [{}]: {}", self.key, err),
        }
    }

    fn lock(&self) -> MutexGuard<'_, dyn Storage + Send + Sync + 'static> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_file<T: DeserializeOwned + Default>(&self) -> Result<T, SlotReadError> {
        let result = self.lock().read_blob(&self.key)?;

        match result {
            ReadBlobState::Found(file_contents) => {
                if file_contents.iter().all(u8::is_ascii_whitespace) {
                    return Ok(T::default());
                }

                serde_json::from_slice(&file_contents).map_err(|source| {
                    SlotReadError::Malformed {
                        source,
                        contents: file_contents,
                    }
                })
            }
            ReadBlobState::NotFound => Ok(T::default()),
        }
    }

    fn write_file<T: Serialize + ?Sized>(&self, data: &T) -> StorageResult<()> {
        let serialized_bytes = serde_json::to_vec(data).map_err(StorageError::UnableToEncodeSlot)?;

        self.lock().write_blob(&self.key, serialized_bytes)
    }
}

#[derive(thiserror::Error, Debug)]
enum SlotReadError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("malformed contents: {source}")]
    Malformed {
        source: serde_json::Error,
        contents: Vec<u8>,
    },
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use test_log::test;

    use crate::{consts::consts::PERSONS_SLOT, persistence::storage::memory::MemoryStorage};

    use super::*;

    fn slot_with(bytes: &[u8]) -> PersonSlot {
        let storage = MemoryStorage::with_blob(PERSONS_SLOT, bytes.to_vec());

        PersonSlot::new(Arc::new(Mutex::new(storage)), PERSONS_SLOT.to_string())
    }

    #[test]
    fn missing_slot_loads_empty() {
        let slot = PersonSlot::new(
            Arc::new(Mutex::new(MemoryStorage::new())),
            PERSONS_SLOT.to_string(),
        );

        assert!(slot.load().is_empty());
    }

    #[test]
    fn blank_and_null_slots_load_empty() {
        assert!(slot_with(b"").load().is_empty());
        assert!(slot_with(b"  \n").load().is_empty());
        assert!(slot_with(b"null").load().is_empty());
    }

    #[test]
    fn malformed_slot_fails_open() {
        assert!(slot_with(b"{not json").load().is_empty());
        assert!(slot_with(br#"[{"id": "nope"}]"#).load().is_empty());
    }

    #[test]
    fn malformed_contents_are_backed_up() {
        // Given a slot a later save would overwrite
        let storage = Arc::new(Mutex::new(MemoryStorage::with_blob(
            PERSONS_SLOT,
            br#"[{"id": 1, "nationality": "Martian"}]"#.to_vec(),
        )));
        let slot = PersonSlot::new(storage.clone(), PERSONS_SLOT.to_string());

        // When it fails to load and is then saved over
        assert!(slot.load().is_empty());
        slot.save(&[Person::new_test(2, "Bob")]).unwrap();

        // Then the unreadable bytes survive under the backup key
        let storage = storage.lock().unwrap();
        assert_eq!(
            storage.blob("persons.bak"),
            Some(&br#"[{"id": 1, "nationality": "Martian"}]"#[..])
        );
    }

    #[test]
    fn readable_slot_writes_no_backup() {
        let storage = Arc::new(Mutex::new(MemoryStorage::with_blob(
            PERSONS_SLOT,
            b"[]".to_vec(),
        )));
        let slot = PersonSlot::new(storage.clone(), PERSONS_SLOT.to_string());

        slot.load();

        assert_eq!(storage.lock().unwrap().blob("persons.bak"), None);
    }

    #[test]
    fn saved_people_load_back() {
        let slot = slot_with(b"");
        let people = vec![Person::new_test(1, "Ann"), Person::new_test(2, "Bob")];

        slot.save(&people).unwrap();

        assert_eq!(slot.load(), people);
    }

    #[test]
    fn stored_text_salary_loads_as_number() {
        let slot = slot_with(
            br#"[{
                "id": 1, "title": "Ms.", "firstname": "Ann", "lastname": "Lee",
                "birthday": "1990-05-01", "nationality": "British", "gender": "Female",
                "mobilePhone": "+66812345678", "expectedSalary": "5000"
            }]"#,
        );

        let people = slot.load();

        assert_eq!(people.len(), 1);
        assert_eq!(people[0].expected_salary.value(), 5000.0);
    }
}
