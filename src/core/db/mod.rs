/// Database Module
///
/// The database layer is split into two concerns:
/// - **Connection Management** (`connection.rs`): opens the backend handle
///   and runs metadata queries and statements against it
/// - **Statement Results** (`query.rs`): classifies statements and converts
///   driver column data into a display-ready value type
///
/// All operations use the crate-wide `SqlRunError` type for error propagation.
pub mod connection;
pub mod query;

pub use connection::*;
pub use query::*;
