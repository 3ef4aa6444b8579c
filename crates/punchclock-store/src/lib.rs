//! Persistence layer for punchclock
//!
//! Provides:
//! - Whole-sequence persistence of attendance records under one key
//! - SQLite-backed key-value storage
//! - The seed dataset used before anything has been persisted

mod seed;
mod sqlite;
mod traits;

pub use seed::*;
pub use sqlite::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Stored bytes exist but cannot be decoded
    pub fn is_corrupt_data(&self) -> bool {
        matches!(self, StoreError::Serialization(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
