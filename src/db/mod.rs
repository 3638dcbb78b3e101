pub mod memory;
pub mod repository;
pub mod sqlite;

pub use memory::MemoryStore;
pub use repository::*;
pub use sqlite::SqliteStore;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::AppointmentStatus;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Daily capacity of {capacity} reached for {day}")]
    DayFull { day: NaiveDate, capacity: usize },

    #[error("Cannot move appointment from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Corrupt row in {table}: {reason}")]
    Corrupt { table: &'static str, reason: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}
