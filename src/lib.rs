//! Command-line presentation layer for the person store: translated table
//! output, sorting and paging on top of the `database` crate.

pub mod i18n;
pub mod view;
