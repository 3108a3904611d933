//! Persistence layer: the embedded database and its tables.

pub mod database;
