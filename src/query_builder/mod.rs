use std::mem;

use crate::driver::Connection;
use crate::error::SqlChainError;
use crate::types::SqlValue;

mod binder;
mod clauses;
mod comparison;
mod dml;
mod fragments;
mod release;
mod select;

pub use binder::bind_values;
pub use comparison::Comparison;
pub use dml::InsertInto;
pub use fragments::{format_fields, placeholder_list};

use release::{Release, Resource};

/// Which top-level command the builder is currently assembling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandKind {
    #[default]
    Unset,
    Select,
    Insert,
    Delete,
}

/// Lifecycle of the command a terminal call runs.
///
/// `Idle -> CommandBuilt -> (Executed | QueryOpened) -> Closed`. A builder whose connection stays
/// open returns to `Idle` once the command is released; `Closed` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandState {
    #[default]
    Idle,
    CommandBuilt,
    Executed,
    QueryOpened,
    Closed,
}

impl CommandState {
    fn move_to(&mut self, next: CommandState) {
        if *self == CommandState::Closed {
            return;
        }
        tracing::trace!(from = ?*self, to = ?next, "statement state");
        *self = next;
    }
}

/// Fluent builder that accumulates SQL text and bound values, then runs them on the connection
/// it owns.
///
/// Chained calls mutate the builder in place and hand back `&mut Self`; a terminal call
/// ([`execute`](Self::execute), [`InsertInto::values`], [`fetch`](Self::fetch)) prepares the
/// command, binds, runs it and releases every resource it opened.
///
/// ```rust
/// use sql_chain::prelude::*;
///
/// # fn main() -> Result<(), SqlChainError> {
/// let connection = SqliteConnection::open_in_memory()?;
/// connection.execute_batch("CREATE TABLE categories (id INTEGER, name TEXT)")?;
///
/// let mut builder = StatementBuilder::new(connection).close_on_complete(false);
/// builder.insert("categories", ["id", "name"], sql_values![8, "books"])?;
///
/// let rows = builder
///     .select_from("categories")
///     .where_()
///     .param("id")
///     .equals_value(8)
///     .fetch()?;
/// assert_eq!(rows.get("name").unwrap(), [SqlValue::from("books")]);
///
/// builder.close()?;
/// # Ok(())
/// # }
/// ```
pub struct StatementBuilder<C: Connection> {
    connection: C,
    close_on_complete: bool,
    kind: CommandKind,
    sql: String,
    params: Vec<String>,
    values: Vec<SqlValue>,
    insert_fields: Vec<String>,
    state: CommandState,
    rows_affected: Option<usize>,
}

impl<C: Connection> StatementBuilder<C> {
    /// Take ownership of `connection`.
    ///
    /// Terminal calls close the connection by default; see
    /// [`close_on_complete`](Self::close_on_complete).
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            close_on_complete: true,
            kind: CommandKind::Unset,
            sql: String::new(),
            params: Vec::new(),
            values: Vec::new(),
            insert_fields: Vec::new(),
            state: CommandState::Idle,
            rows_affected: None,
        }
    }

    /// Whether a terminal call also closes the connection. With `false` the builder can run any
    /// number of commands until [`close`](Self::close) or drop.
    #[must_use]
    pub fn close_on_complete(mut self, close_on_complete: bool) -> Self {
        self.close_on_complete = close_on_complete;
        self
    }

    /// Start a `SELECT * FROM table`, discarding anything accumulated so far.
    pub fn select_from(&mut self, table: &str) -> &mut Self {
        self.start(CommandKind::Select, format!("SELECT * FROM {table}"));
        self
    }

    /// Start a `DELETE FROM table`, discarding anything accumulated so far.
    pub fn delete_from(&mut self, table: &str) -> &mut Self {
        self.start(CommandKind::Delete, format!("DELETE FROM {table}"));
        self
    }

    /// Start an `INSERT INTO table(f1, f2, ..)`. The returned handle only offers
    /// [`InsertInto::values`], which must supply exactly one value per field.
    pub fn insert_into<I, S>(&mut self, table: &str, fields: I) -> InsertInto<'_, C>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        self.start(
            CommandKind::Insert,
            format!("INSERT INTO {table}{}", format_fields(&fields)),
        );
        self.insert_fields = fields;
        InsertInto::new(self)
    }

    /// Close the connection. Calling it again, or dropping the builder afterwards, does nothing.
    ///
    /// # Errors
    /// Returns `SqlChainError::ResourceError` if the driver fails to close the connection.
    pub fn close(&mut self) -> Result<(), SqlChainError> {
        if self.connection.is_closed() {
            self.state.move_to(CommandState::Closed);
            return Ok(());
        }
        let mut release = Release::default();
        release.attempt(Resource::Connection, self.connection.close());
        self.state.move_to(CommandState::Closed);
        release.finish(Ok(()))
    }

    /// SQL text accumulated so far.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Names recorded by [`param`](Self::param), in call order.
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.params
    }

    /// Values recorded by the comparison calls, in call order.
    #[must_use]
    pub fn bound_values(&self) -> &[SqlValue] {
        &self.values
    }

    #[must_use]
    pub fn command_kind(&self) -> CommandKind {
        self.kind
    }

    #[must_use]
    pub fn state(&self) -> CommandState {
        self.state
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.connection.is_closed()
    }

    /// Rows affected by the last successful mutation.
    #[must_use]
    pub fn rows_affected(&self) -> Option<usize> {
        self.rows_affected
    }

    #[must_use]
    pub fn connection(&self) -> &C {
        &self.connection
    }

    fn start(&mut self, kind: CommandKind, sql: String) {
        tracing::trace!(?kind, "starting command");
        self.kind = kind;
        self.sql = sql;
        self.params.clear();
        self.values.clear();
        self.insert_fields.clear();
        self.state.move_to(CommandState::Idle);
    }

    /// Hand the accumulated statement to a terminal call and leave the builder empty.
    fn take_statement(&mut self) -> (String, Vec<String>, Vec<SqlValue>) {
        self.kind = CommandKind::Unset;
        self.insert_fields.clear();
        (
            mem::take(&mut self.sql),
            mem::take(&mut self.params),
            mem::take(&mut self.values),
        )
    }

    fn ensure_open(&self) -> Result<(), SqlChainError> {
        if self.connection.is_closed() {
            Err(SqlChainError::ConnectionError(
                "statement builder connection is closed".into(),
            ))
        } else {
            Ok(())
        }
    }

    /// Last step of every terminal call: close the connection when configured to, settle the
    /// state and fold release failures into the result.
    fn complete<T>(
        &mut self,
        mut release: Release,
        outcome: Result<T, SqlChainError>,
    ) -> Result<T, SqlChainError> {
        if self.close_on_complete {
            release.attempt(Resource::Connection, self.connection.close());
        }
        let settled = if self.connection.is_closed() {
            CommandState::Closed
        } else {
            CommandState::Idle
        };
        self.state.move_to(settled);
        release.finish(outcome)
    }
}

impl<C: Connection> Drop for StatementBuilder<C> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::warn!(error = %err, "failed to close connection while dropping statement builder");
        }
    }
}

impl<C: Connection> std::fmt::Debug for StatementBuilder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementBuilder")
            .field("kind", &self.kind)
            .field("sql", &self.sql)
            .field("params", &self.params)
            .field("values", &self.values)
            .field("state", &self.state)
            .field("close_on_complete", &self.close_on_complete)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "sqlite")]
mod sqlite_constructors {
    use std::path::Path;

    use super::StatementBuilder;
    use crate::config::ConnectionConfig;
    use crate::error::SqlChainError;
    use crate::sqlite::SqliteConnection;

    impl StatementBuilder<SqliteConnection> {
        /// Open the `SQLite` database described by `config`.
        ///
        /// # Errors
        /// Returns `SqlChainError::ConnectionError` if the database cannot be opened.
        pub fn connect(config: &ConnectionConfig) -> Result<Self, SqlChainError> {
            let connection = SqliteConnection::open(config)?;
            Ok(Self::new(connection).close_on_complete(config.close_on_complete))
        }

        /// Load a properties file and open the database it names.
        ///
        /// # Errors
        /// Returns `SqlChainError::ConfigError` if the file is missing or incomplete, and
        /// `SqlChainError::ConnectionError` if the database cannot be opened.
        pub fn from_properties_file(path: impl AsRef<Path>) -> Result<Self, SqlChainError> {
            let config = ConnectionConfig::from_properties_file(path)?;
            Self::connect(&config)
        }
    }
}
