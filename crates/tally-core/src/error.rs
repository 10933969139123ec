use std::io;

use thiserror::Error;

use tally_domain::LimitExceeded;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Count limit reached for the current frequency window")]
    LimitExceeded,
    #[error("Counter not found: {0}")]
    CounterNotFound(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<LimitExceeded> for CoreError {
    fn from(_: LimitExceeded) -> Self {
        CoreError::LimitExceeded
    }
}
