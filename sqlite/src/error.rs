//! Error types for connector and introspection operations.
//!
//! Splits failures into the classes the session reacts to differently:
//! a database that cannot be opened, a statement the engine rejected, and
//! lower-level I/O or driver faults.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to an ocean database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be opened (missing file, not a database,
    /// permission denied).
    #[error("cannot open database '{}': {reason}", path.display())]
    Connection { path: PathBuf, reason: String },

    /// The engine rejected a statement. Carries the engine's message text.
    #[error("{0}")]
    Query(String),

    /// An operation was attempted after the connector was closed.
    #[error("database connection is closed")]
    Closed,

    /// `create` was asked to write over an existing file without consent.
    #[error("database '{}' already exists", .0.display())]
    AlreadyExists(PathBuf),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite driver failure outside of statement execution.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    /// Wraps a driver error raised while running a user statement.
    ///
    /// Only the engine's own message is kept, so users see exactly what
    /// SQLite reported.
    pub(crate) fn query(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(message)) => StoreError::Query(message),
            other => StoreError::Query(other.to_string()),
        }
    }

    pub(crate) fn connection(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        StoreError::Connection {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
