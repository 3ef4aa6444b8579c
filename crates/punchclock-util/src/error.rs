//! Error types for punchclock

use thiserror::Error;

/// Core error type for punchclock operations
#[derive(Debug, Error)]
pub enum PunchclockError {
    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Persisted attendance state is corrupt: {0}")]
    CorruptState(String),
}

impl PunchclockError {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreError(msg.into())
    }

    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptState(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PunchclockError>;
