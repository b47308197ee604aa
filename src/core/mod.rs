/// Core Module for sqlrun
///
/// Shared infrastructure: the database layer and the crate-wide error type.
pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{Result, SqlRunError};
