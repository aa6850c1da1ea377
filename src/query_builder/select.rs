use crate::driver::{Connection, Cursor, PreparedCommand};
use crate::error::SqlChainError;
use crate::results::{ResultColumns, materialize};
use crate::types::SqlValue;

use super::binder::{bind_values, check_alignment, check_param_pairs};
use super::release::{Release, Resource};
use super::{CommandState, Comparison, StatementBuilder};

impl<C: Connection> StatementBuilder<C> {
    /// Run the accumulated statement as a query and materialize every row into columns.
    ///
    /// A `;` terminator is appended before preparing. Each recorded `param` must have been paired
    /// with exactly one comparison, otherwise nothing is sent and a `StatementError` comes back.
    /// Cursor, command and (when configured) connection are all released before returning, even
    /// on failure.
    ///
    /// # Errors
    /// Returns `SqlChainError::StatementError` on a name/value or slot/value mismatch,
    /// `SqlChainError::ConnectionError` if the builder is closed, the driver's error, or the first
    /// release failure.
    pub fn fetch(&mut self) -> Result<ResultColumns, SqlChainError> {
        let (mut sql, params, values) = self.take_statement();
        sql.push(';');
        let mut release = Release::default();
        let outcome = self
            .ensure_open()
            .and_then(|()| check_param_pairs(&params, &values))
            .and_then(|()| check_alignment(&sql, &values))
            .and_then(|()| self.run_query(&sql, &values, &mut release));
        self.complete(release, outcome)
    }

    /// Alias of [`fetch`](Self::fetch).
    ///
    /// # Errors
    /// Same as [`fetch`](Self::fetch).
    pub fn response(&mut self) -> Result<ResultColumns, SqlChainError> {
        self.fetch()
    }

    /// `WHERE name <op> ?` followed by [`fetch`](Self::fetch), for the common single-condition
    /// lookup.
    ///
    /// ```rust
    /// # use sql_chain::prelude::*;
    /// # fn demo(builder: &mut StatementBuilder<SqliteConnection>) -> Result<(), SqlChainError> {
    /// let cheap = builder
    ///     .select_from("products")
    ///     .where_get("price", Comparison::SmallerThan, 10)?;
    /// # let _ = cheap;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Same as [`fetch`](Self::fetch).
    pub fn where_get(
        &mut self,
        name: &str,
        comparison: Comparison,
        value: impl Into<SqlValue>,
    ) -> Result<ResultColumns, SqlChainError> {
        self.where_().param(name).compare(comparison, value).fetch()
    }

    fn run_query(
        &mut self,
        sql: &str,
        values: &[SqlValue],
        release: &mut Release,
    ) -> Result<ResultColumns, SqlChainError> {
        tracing::debug!(sql, values = values.len(), "executing query");
        let mut command = self.connection.prepare(sql)?;
        self.state.move_to(CommandState::CommandBuilt);

        let outcome = bind_values(&mut command, values).and_then(|()| {
            let mut cursor = command.execute_query()?;
            self.state.move_to(CommandState::QueryOpened);
            let collected = materialize(&mut cursor);
            release.attempt(Resource::Cursor, cursor.close());
            collected
        });

        release.attempt(Resource::Command, command.close());
        outcome
    }
}
