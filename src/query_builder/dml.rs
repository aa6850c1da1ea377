use std::mem;

use crate::driver::{Connection, PreparedCommand};
use crate::error::SqlChainError;
use crate::types::SqlValue;

use super::binder::{bind_values, check_alignment, check_param_pairs};
use super::release::{Release, Resource};
use super::{CommandState, StatementBuilder, placeholder_list};

/// Second half of a two-phase insert, returned by
/// [`StatementBuilder::insert_into`].
#[must_use = "an insert only runs once `values` is called"]
pub struct InsertInto<'b, C: Connection> {
    builder: &'b mut StatementBuilder<C>,
}

impl<'b, C: Connection> InsertInto<'b, C> {
    pub(super) fn new(builder: &'b mut StatementBuilder<C>) -> Self {
        Self { builder }
    }

    /// The `INSERT INTO table(fields)` text built so far.
    #[must_use]
    pub fn sql(&self) -> &str {
        self.builder.sql()
    }

    /// Append `VALUES (?, ..);`, bind `objects` and run the insert.
    ///
    /// # Errors
    /// Returns `SqlChainError::StatementError` if `objects` does not hold one value per field,
    /// `SqlChainError::ConnectionError` if the builder is closed, or the driver's error.
    pub fn values<I, V>(self, objects: I) -> Result<bool, SqlChainError>
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        let objects: Vec<SqlValue> = objects.into_iter().map(Into::into).collect();
        self.builder.finish_insert(objects)
    }
}

impl<C: Connection> StatementBuilder<C> {
    /// Run the accumulated statement as a mutation (`INSERT`/`UPDATE`/`DELETE`).
    ///
    /// Any statement is accepted; rows a `SELECT` produces here are discarded.
    ///
    /// The accumulated names and values are cleared whatever the outcome, so the builder is ready
    /// for a new command.
    ///
    /// # Errors
    /// Returns `SqlChainError::StatementError` if a `param` was not followed by exactly one
    /// comparison or the number of `?` slots differs from the number of bound values,
    /// `SqlChainError::ConnectionError` if the builder is closed, or the driver's error.
    pub fn execute(&mut self) -> Result<bool, SqlChainError> {
        let (sql, params, values) = self.take_statement();
        let mut release = Release::default();
        let outcome = self
            .ensure_open()
            .and_then(|()| check_param_pairs(&params, &values))
            .and_then(|()| check_alignment(&sql, &values))
            .and_then(|()| self.run_mutation(&sql, &values, &mut release));
        self.complete(release, outcome).map(|_| true)
    }

    /// Insert one row in a single call.
    ///
    /// ```rust
    /// # use sql_chain::prelude::*;
    /// # fn demo(builder: &mut StatementBuilder<SqliteConnection>) -> Result<(), SqlChainError> {
    /// builder.insert("products", ["name", "price"], sql_values!["pen", 2.5])?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Same as [`InsertInto::values`].
    pub fn insert<F, S, I, V>(
        &mut self,
        table: &str,
        fields: F,
        values: I,
    ) -> Result<bool, SqlChainError>
    where
        F: IntoIterator<Item = S>,
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.insert_into(table, fields).values(values)
    }

    fn finish_insert(&mut self, objects: Vec<SqlValue>) -> Result<bool, SqlChainError> {
        let fields = mem::take(&mut self.insert_fields);
        let (mut sql, _params, _values) = self.take_statement();
        let mut release = Release::default();
        let outcome = self
            .ensure_open()
            .and_then(|()| check_arity(&fields, &objects))
            .and_then(|()| {
                sql.push_str(" VALUES ");
                sql.push_str(&placeholder_list(objects.len()));
                sql.push(';');
                self.run_mutation(&sql, &objects, &mut release)
            });
        self.complete(release, outcome).map(|_| true)
    }

    fn run_mutation(
        &mut self,
        sql: &str,
        values: &[SqlValue],
        release: &mut Release,
    ) -> Result<usize, SqlChainError> {
        tracing::debug!(sql, values = values.len(), "executing mutation");
        let mut command = self.connection.prepare(sql)?;
        self.state.move_to(CommandState::CommandBuilt);

        let outcome = bind_values(&mut command, values).and_then(|()| command.execute_mutation());
        if let Ok(&affected) = outcome.as_ref() {
            self.state.move_to(CommandState::Executed);
            self.rows_affected = Some(affected);
            tracing::debug!(affected, "mutation executed");
        }

        release.attempt(Resource::Command, command.close());
        outcome
    }
}

fn check_arity(fields: &[String], objects: &[SqlValue]) -> Result<(), SqlChainError> {
    if fields.len() == objects.len() {
        Ok(())
    } else {
        Err(SqlChainError::StatementError(format!(
            "insert names {} field(s) {fields:?} but {} value(s) were supplied",
            fields.len(),
            objects.len()
        )))
    }
}
