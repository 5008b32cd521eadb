//! Error types for ea-output.

use ea_actor::ActorError;
use thiserror::Error;

use crate::ValueKind;

/// Errors that can occur while recording or writing results.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("results have already been written")]
    AlreadyWritten,

    #[error("data point {data_point} expects {expected:?} values")]
    TypeMismatch {
        data_point: String,
        expected:   ValueKind,
    },

    #[error("expected {expected} values for one step, got {actual}")]
    ValueCount { expected: usize, actual: usize },

    #[error(transparent)]
    Actor(#[from] ActorError),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
