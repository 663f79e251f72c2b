use thiserror::Error;

use crate::domain::ValidationError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Stored ledger is corrupt: {0}")]
    Corrupt(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl StoreError {
    /// The validation failure behind this error, if it is one.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            StoreError::Validation(err) => Some(err),
            _ => None,
        }
    }
}
