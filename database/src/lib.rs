//! Person record store: a typed person list mirrored to a durable key-value slot.

pub mod consts;
pub mod database;
pub mod model;
pub mod persistence;
