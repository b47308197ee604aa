/// Error types for the sqlrun application.
///
/// Every fallible operation in the crate returns the same error enum so the
/// shell can decide, per kind, whether a failure aborts the process or only
/// the current menu operation.
use thiserror::Error;

/// Application-wide error type.
///
/// The kinds split along recovery boundaries:
/// - `Connection` is fatal at startup (no handle, nothing to do)
/// - `Database` and `Validation` abort a single menu operation
/// - `Io` and `Interrupted` end the session from any prompt
#[derive(Error, Debug)]
pub enum SqlRunError {
    /// The database handle could not be established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A statement or metadata query failed. Wraps the driver's own
    /// message verbatim for both backends.
    #[error("{0}")]
    Database(String),

    /// Input rejected by the shell before anything was sent to the database.
    #[error("{0}")]
    Validation(String),

    /// The settings file could not be read or written.
    #[error("settings error: {0}")]
    Config(String),

    /// File system and terminal I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Keyboard interrupt at a prompt. Turned into a graceful shutdown by
    /// the outermost loop, never reported as a failure.
    #[error("interrupted")]
    Interrupted,
}

impl From<rusqlite::Error> for SqlRunError {
    fn from(err: rusqlite::Error) -> Self {
        SqlRunError::Database(err.to_string())
    }
}

impl From<postgres::Error> for SqlRunError {
    fn from(err: postgres::Error) -> Self {
        SqlRunError::Database(err.to_string())
    }
}

/// Type alias for Result to use SqlRunError as the error type.
pub type Result<T> = std::result::Result<T, SqlRunError>;
