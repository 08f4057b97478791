pub mod citizen_id;
pub mod form;
pub mod person;
pub mod statement;
