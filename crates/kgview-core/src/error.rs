//! Error types for kgview.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Malformed record in {table}.{field}: {reason}")]
    MalformedRecord {
        table: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the backing store could not be reached at all.
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, Error::SourceUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
