use std::collections::HashSet;

use crate::consts::consts::PersonId;

use super::person::Person;

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Add(Person),
    /// Replaces the record with the same id
    Update(Person),
    Remove(PersonId),
    RemoveMany(HashSet<PersonId>),
    Get(PersonId),
    /// Returns every person in insertion order
    List,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StatementResult {
    /// The record as it was added
    Single(Person),
    /// Lookup by id, `None` when no record has the id
    GetSingle(Option<Person>),
    /// The record after an update, `None` when no record had the id
    Updated(Option<Person>),
    /// Number of records a remove took out
    Removed(usize),
    List(Vec<Person>),
}
