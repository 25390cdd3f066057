//! Error types — participant lifecycle, storage, and serialization.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("participant {name} is already registered")]
    DuplicateParticipant { name: String },

    #[error("participant {name} is not registered")]
    UnknownParticipant { name: String },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChatError>;
