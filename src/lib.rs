//! # sql-chain
//!
//! A fluent statement builder: chained calls accumulate SQL text and typed bound values, a
//! terminal call prepares the command on the connection the builder owns, binds the values in
//! order, runs it, and for queries turns the cursor into a column-name-to-values mapping.
//!
//! ```rust
//! use sql_chain::prelude::*;
//!
//! # fn main() -> Result<(), SqlChainError> {
//! let connection = SqliteConnection::open_in_memory()?;
//! connection.execute_batch("CREATE TABLE products (name TEXT, price REAL)")?;
//!
//! let mut builder = StatementBuilder::new(connection).close_on_complete(false);
//! builder.insert("products", ["name", "price"], sql_values!["pen", 2.5])?;
//! builder.insert("products", ["name", "price"], sql_values!["notebook", 12.0])?;
//!
//! let pens = builder.select_from("products").where_().param("name").like("pen").fetch()?;
//! assert_eq!(pens.get("price").unwrap(), [SqlValue::Float(2.5)]);
//!
//! builder.delete_from("products").where_().param("price").bigger_than(10).execute()?;
//! assert_eq!(builder.rows_affected(), Some(1));
//! # Ok(())
//! # }
//! ```
//!
//! The builder is single-owner and synchronous: every call blocks until the connection answers,
//! and concurrent callers need their own builder and connection.
//!
//! Table and column names are spliced into the SQL text as given; only values travel as bound
//! parameters.

pub mod config;
pub mod driver;
pub mod error;
pub mod placeholders;
pub mod prelude;
pub mod query_builder;
pub mod results;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::ConnectionConfig;
pub use error::SqlChainError;
pub use placeholders::count_placeholders;
pub use query_builder::{
    CommandKind, CommandState, Comparison, InsertInto, StatementBuilder, bind_values,
    format_fields, placeholder_list,
};
pub use results::{ResultColumns, materialize};
pub use types::SqlValue;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteConnection;
