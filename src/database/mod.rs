//! Document database
//!
//! Binds the value model to the record store: save, fetch, delete, batch
//! and import documents in a named database directory.

#[allow(clippy::module_inception)]
mod database;
mod errors;

pub use database::{Database, DATABASE_EXTENSION};
pub use errors::{DatabaseError, DatabaseResult, ErrorCode, ErrorDomain};
