use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(#[source] mongodb::error::Error),

    #[error("Connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("Database not initialized")]
    NotInitialized,

    #[error("Insert of {commission_id} failed: {reason}")]
    Insert {
        commission_id: String,
        reason: String,
    },

    #[error("Invalid record {commission_id}: {reason}")]
    InvalidRecord {
        commission_id: String,
        reason: String,
    },
}

impl StoreError {
    pub fn insert(commission_id: impl Into<String>, reason: impl ToString) -> Self {
        StoreError::Insert {
            commission_id: commission_id.into(),
            reason: reason.to_string(),
        }
    }
}
