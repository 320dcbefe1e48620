//! SQLite storage for plan documents and registries.
//!
//! This module provides the synchronous database layer behind
//! [`crate::repository::SqliteRepository`]. Each [`Database`] wraps one
//! connection; the repository opens a fresh one per operation on a blocking
//! task.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod plan_queries;
pub mod registry_queries;
pub mod schema;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
