use std::{collections::HashSet, time::Instant};

use thiserror::Error;

use crate::{
    consts::consts::PersonId,
    model::{
        person::Person,
        statement::{Statement, StatementResult},
    },
    persistence::{
        slot::PersonSlot,
        storage::{SharedStorage, StorageError},
    },
};

use super::{
    options::DatabaseOptions,
    table::table::{ApplyErrors, PersonTable},
};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error(transparent)]
    Apply(#[from] ApplyErrors),

    /// The mutation was not applied, the in-memory list is as it was before the call
    #[error("Unable to persist people, change discarded: {0}")]
    Persistence(#[from] StorageError),
}

enum CommitStatus {
    Commit,
    Unchanged,
}

/// Owns the person list and mirrors every change to the durable slot.
///
/// Each mutation is applied to a copy of the list, the copy is written out, and only
/// then does it replace the live list. A failed write leaves the store untouched.
pub struct Database {
    person_table: PersonTable,
    person_slot: PersonSlot,
}

impl Database {
    pub fn new(storage: SharedStorage, options: &DatabaseOptions) -> Self {
        let person_slot = PersonSlot::new(storage, options.slot_key.clone());

        let person_table = match options.restore {
            true => Self::restore(&person_slot),
            false => PersonTable::new(),
        };

        Self {
            person_table,
            person_slot,
        }
    }

    /// Creates the storage described by the options, then the store on top of it
    pub fn from_options(options: &DatabaseOptions) -> Result<Self, StorageError> {
        let storage = options.storage_engine.create()?;

        log::info!("Storage Location: [{:?}]", options.storage_engine);

        Ok(Self::new(storage, options))
    }

    #[cfg(test)]
    pub fn new_test() -> Self {
        Self::from_options(&DatabaseOptions::new_test())
            .expect("memory storage should always initialize")
    }

    fn restore(person_slot: &PersonSlot) -> PersonTable {
        let now = Instant::now();

        let person_table = PersonTable::restore_table(person_slot.load());

        log::info!(
            "✅ Successful Restore [Duration: {}ms, Slot: {}, People: {}]",
            now.elapsed().as_millis(),
            person_slot.key(),
            person_table.len()
        );

        person_table
    }

    /// Re-reads the durable slot, what a fresh process start would see
    pub fn load(&self) -> Vec<Person> {
        self.person_slot.load()
    }

    pub fn list(&self) -> &[Person] {
        self.person_table.rows()
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.person_table.get(id)
    }

    pub fn len(&self) -> usize {
        self.person_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.person_table.is_empty()
    }

    pub fn add(&mut self, person: Person) -> Result<Person, DatabaseError> {
        self.commit("add", |table| {
            let person = table.insert(person)?;
            Ok((person, CommitStatus::Commit))
        })
    }

    /// `Ok(None)` when no record has the id, nothing is written in that case
    pub fn update(&mut self, person: Person) -> Result<Option<Person>, DatabaseError> {
        self.commit("update", |table| match table.replace(person) {
            Some(person) => Ok((Some(person), CommitStatus::Commit)),
            None => Ok((None, CommitStatus::Unchanged)),
        })
    }

    /// Returns how many records were removed
    pub fn delete_one(&mut self, id: PersonId) -> Result<usize, DatabaseError> {
        self.commit("delete_one", |table| Ok(removed(table.remove(id))))
    }

    /// Returns how many records were removed, an empty set removes nothing
    pub fn delete_many(&mut self, ids: &HashSet<PersonId>) -> Result<usize, DatabaseError> {
        self.commit("delete_many", |table| Ok(removed(table.remove_many(ids))))
    }

    pub fn apply(&mut self, statement: Statement) -> Result<StatementResult, DatabaseError> {
        let statement_result = match statement {
            Statement::Add(person) => StatementResult::Single(self.add(person)?),
            Statement::Update(person) => StatementResult::Updated(self.update(person)?),
            Statement::Remove(id) => StatementResult::Removed(self.delete_one(id)?),
            Statement::RemoveMany(ids) => StatementResult::Removed(self.delete_many(&ids)?),
            Statement::Get(id) => StatementResult::GetSingle(self.get(id).cloned()),
            Statement::List => StatementResult::List(self.list().to_vec()),
        };

        Ok(statement_result)
    }

    fn commit<T>(
        &mut self,
        statement_name: &str,
        mutation: impl FnOnce(&mut PersonTable) -> Result<(T, CommitStatus), ApplyErrors>,
    ) -> Result<T, DatabaseError> {
        let mut next_table = self.person_table.clone();

        let (result, status) = match mutation(&mut next_table) {
            Ok(result) => result,
            Err(err) => {
                log::info!("⚠️  Rejected: [{}] {}", statement_name, err);
                return Err(err.into());
            }
        };

        if let CommitStatus::Unchanged = status {
            log::debug!("Nothing to persist: [{}]", statement_name);
            return Ok(result);
        }

        if let Err(err) = self.person_slot.save(next_table.rows()) {
            log::error!("⚠️  Rolled back: [{}] {}", statement_name, err);
            return Err(err.into());
        }

        log::debug!(
            "✅ Committed: [{}, People: {}]",
            statement_name,
            next_table.len()
        );

        self.person_table = next_table;

        Ok(result)
    }
}

fn removed(count: usize) -> (usize, CommitStatus) {
    match count {
        0 => (0, CommitStatus::Unchanged),
        count => (count, CommitStatus::Commit),
    }
}
