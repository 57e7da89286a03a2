//! Storage error types.
//!
//! Surface to the router as [`statebot_core::StatebotError::Storage`].

use statebot_core::StatebotError;
use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Corrupt state data for user {user_id} in chat {chat_id}: {source}")]
    CorruptData {
        user_id: i64,
        chat_id: i64,
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StorageError> for StatebotError {
    fn from(e: StorageError) -> Self {
        StatebotError::Storage(e.to_string())
    }
}
