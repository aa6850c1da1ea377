//! The connection capability a [`StatementBuilder`](crate::StatementBuilder) drives.
//!
//! A backend supplies three handles: the connection, a prepared command borrowed from it, and a
//! cursor borrowed from the command. The borrows mirror the release order the builder enforces:
//! a cursor cannot outlive its command and a command cannot outlive its connection.

use crate::error::SqlChainError;
use crate::types::SqlValue;

/// A live relational connection.
pub trait Connection {
    type Command<'conn>: PreparedCommand
    where
        Self: 'conn;

    /// Parse `sql` into a command awaiting bindings.
    ///
    /// # Errors
    /// Returns `SqlChainError` if the connection is closed or the driver rejects the SQL.
    fn prepare(&mut self, sql: &str) -> Result<Self::Command<'_>, SqlChainError>;

    fn is_closed(&self) -> bool;

    /// Close the connection. Closing an already closed connection is a no-op.
    ///
    /// # Errors
    /// Returns `SqlChainError::ResourceError` if the driver fails to close.
    fn close(&mut self) -> Result<(), SqlChainError>;
}

/// A prepared statement with positional slots.
pub trait PreparedCommand {
    type Cursor<'cmd>: Cursor
    where
        Self: 'cmd;

    /// Bind `value` to the 1-based slot `position`.
    ///
    /// # Errors
    /// Returns `SqlChainError` if the slot does not exist or the driver rejects the value.
    fn bind(&mut self, position: usize, value: &SqlValue) -> Result<(), SqlChainError>;

    /// Run the command without producing rows, returning the number of rows affected.
    ///
    /// # Errors
    /// Returns `SqlChainError` if execution fails.
    fn execute_mutation(&mut self) -> Result<usize, SqlChainError>;

    /// Run the command as a row-returning query.
    ///
    /// # Errors
    /// Returns `SqlChainError` if execution fails.
    fn execute_query(&mut self) -> Result<Self::Cursor<'_>, SqlChainError>;

    /// # Errors
    /// Returns `SqlChainError::ResourceError` if the driver fails to finalize the command.
    fn close(self) -> Result<(), SqlChainError>;
}

/// Forward-only iteration over the rows of a query.
pub trait Cursor {
    /// Column names in result order.
    fn column_names(&self) -> &[String];

    /// Move to the next row; `false` once the rows are exhausted.
    ///
    /// # Errors
    /// Returns `SqlChainError` if the driver fails while stepping.
    fn advance(&mut self) -> Result<bool, SqlChainError>;

    /// Value of the current row at the 0-based `column`.
    ///
    /// # Errors
    /// Returns `SqlChainError` if there is no current row or the column is out of range.
    fn value_at(&self, column: usize) -> Result<SqlValue, SqlChainError>;

    /// # Errors
    /// Returns `SqlChainError::ResourceError` if the driver fails to release the cursor.
    fn close(self) -> Result<(), SqlChainError>;
}
