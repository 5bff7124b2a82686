//! Error types for the board application.

use thiserror::Error;

/// Result type for board operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in board operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Graph editing error
    #[error(transparent)]
    Graph(#[from] todenet_graph::Error),

    /// Propagation engine error
    #[error(transparent)]
    Engine(#[from] todenet_engine::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rocksdb::Error> for Error {
    fn from(e: rocksdb::Error) -> Self {
        Error::Storage(e.to_string())
    }
}
