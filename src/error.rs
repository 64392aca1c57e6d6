//! Error type shared by the loader, the extractors and the warehouse.

use rusqlite::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EtlError {
    #[error("Data root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Failed to walk {root}: {source}")]
    Discovery {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line} is not a valid JSON record: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Column {0} is not present in the loaded records")]
    MissingColumn(String),

    #[error("Record {row} could not be converted: {reason}")]
    InvalidRecord { row: usize, reason: String },

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Database error: {0}")]
    Database(rusqlite::Error),
}

impl From<rusqlite::Error> for EtlError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => EtlError::ConstraintViolation(err.to_string()),
            _ => EtlError::Database(err),
        }
    }
}

pub type EtlResult<T> = std::result::Result<T, EtlError>;
