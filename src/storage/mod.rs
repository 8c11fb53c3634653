//! Storage module for the SQLite database.

pub mod database;
pub mod schema;

pub use database::{Database, DatabaseError};
