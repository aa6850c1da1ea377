//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::config::{ConnectionConfig, ConnectionConfigBuilder};
pub use crate::driver::{Connection, Cursor, PreparedCommand};
pub use crate::error::SqlChainError;
pub use crate::query_builder::{CommandKind, CommandState, Comparison, InsertInto, StatementBuilder};
pub use crate::results::ResultColumns;
pub use crate::sql_values;
pub use crate::types::SqlValue;

#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteConnection;
