use std::collections::HashSet;

use thiserror::Error;

use crate::{consts::consts::PersonId, model::person::Person};

#[derive(Error, Debug, PartialEq)]
pub enum ApplyErrors {
    // CRUD - CREATE
    #[error("Cannot create, record already exists: {0}")]
    CannotCreateWhenAlreadyExists(PersonId),
}

/// The person list in insertion order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersonTable {
    person_rows: Vec<Person>,
}

impl PersonTable {
    pub fn new() -> Self {
        Self {
            person_rows: Vec::new(),
        }
    }

    /// Used when restoring from the durable slot. Every stored row is kept, a repeated id
    /// is only reported so the next write does not drop it from the slot.
    pub fn restore_table(people: Vec<Person>) -> Self {
        let mut seen = HashSet::with_capacity(people.len());

        for person in &people {
            if !seen.insert(person.id) {
                log::warn!("Stored person id [{}] appears more than once", person.id);
            }
        }

        Self {
            person_rows: people,
        }
    }

    pub fn rows(&self) -> &[Person] {
        &self.person_rows
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.person_rows.iter().find(|person| person.id == id)
    }

    pub fn len(&self) -> usize {
        self.person_rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.person_rows.is_empty()
    }

    /// Appends to the end of the list
    pub fn insert(&mut self, person: Person) -> Result<Person, ApplyErrors> {
        if self.get(person.id).is_some() {
            return Err(ApplyErrors::CannotCreateWhenAlreadyExists(person.id));
        }

        self.person_rows.push(person.clone());

        Ok(person)
    }

    /// Swaps in `person` at the position of the record with the same id.
    /// Returns `None` and changes nothing when there is no such record.
    pub fn replace(&mut self, person: Person) -> Option<Person> {
        let row = self
            .person_rows
            .iter_mut()
            .find(|existing| existing.id == person.id)?;

        *row = person.clone();

        Some(person)
    }

    pub fn remove(&mut self, id: PersonId) -> usize {
        let before = self.person_rows.len();

        self.person_rows.retain(|person| person.id != id);

        before - self.person_rows.len()
    }

    pub fn remove_many(&mut self, ids: &HashSet<PersonId>) -> usize {
        if ids.is_empty() {
            return 0;
        }

        let before = self.person_rows.len();

        self.person_rows.retain(|person| !ids.contains(&person.id));

        before - self.person_rows.len()
    }
}
