use std::fmt;

use rusqlite::Statement;

use crate::config::ConnectionConfig;
use crate::driver::{Connection, Cursor, PreparedCommand};
use crate::error::SqlChainError;
use crate::types::SqlValue;

use super::params::sql_value_to_sqlite_value;
use super::query::sqlite_read_row;

/// A single owned `rusqlite` connection.
///
/// The handle is `None` once closed, which is what makes [`Connection::close`] idempotent.
pub struct SqliteConnection {
    conn: Option<rusqlite::Connection>,
    path: String,
}

impl SqliteConnection {
    /// Open the database named by `config.url`.
    ///
    /// Accepts a bare path, `:memory:`, `sqlite:path` or `sqlite://path`. `SQLite` has no
    /// authentication, so `user` and `password` are ignored.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConnectionError` if the database cannot be opened.
    pub fn open(config: &ConnectionConfig) -> Result<Self, SqlChainError> {
        let path = sqlite_path(&config.url);
        if !config.user.is_empty() {
            tracing::debug!(user = %config.user, "sqlite ignores connection credentials");
        }
        let conn = rusqlite::Connection::open(path).map_err(|e| {
            SqlChainError::ConnectionError(format!("failed to open SQLite database `{path}`: {e}"))
        })?;
        tracing::debug!(path, "opened sqlite connection");
        Ok(Self::from_rusqlite(conn, path.to_string()))
    }

    /// In-memory database, handy for tests and scratch work.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConnectionError` if `SQLite` cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, SqlChainError> {
        let conn = rusqlite::Connection::open_in_memory().map_err(|e| {
            SqlChainError::ConnectionError(format!("failed to open in-memory SQLite database: {e}"))
        })?;
        Ok(Self::from_rusqlite(conn, ":memory:".to_string()))
    }

    /// Wrap a connection opened elsewhere.
    #[must_use]
    pub fn from_rusqlite(conn: rusqlite::Connection, path: String) -> Self {
        Self {
            conn: Some(conn),
            path,
        }
    }

    /// Run a batch of SQL outside the builder (schema setup, seeding).
    ///
    /// # Errors
    /// Returns `SqlChainError` if the connection is closed or the batch fails.
    pub fn execute_batch(&self, sql: &str) -> Result<(), SqlChainError> {
        self.live()?.execute_batch(sql)?;
        Ok(())
    }

    fn live(&self) -> Result<&rusqlite::Connection, SqlChainError> {
        self.conn.as_ref().ok_or_else(|| {
            SqlChainError::ConnectionError(format!("SQLite connection `{}` is closed", self.path))
        })
    }
}

fn sqlite_path(url: &str) -> &str {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.path)
            .field("closed", &self.conn.is_none())
            .finish()
    }
}

impl Connection for SqliteConnection {
    type Command<'conn> = SqliteCommand<'conn>;

    fn prepare(&mut self, sql: &str) -> Result<SqliteCommand<'_>, SqlChainError> {
        let conn = self.live()?;
        let stmt = conn.prepare(sql)?;
        Ok(SqliteCommand { conn, stmt })
    }

    fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    fn close(&mut self) -> Result<(), SqlChainError> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        conn.close().map_err(|(_conn, e)| {
            SqlChainError::ResourceError(format!(
                "failed to close SQLite connection `{}`: {e}",
                self.path
            ))
        })
    }
}

/// Prepared `rusqlite` statement borrowed from a [`SqliteConnection`].
pub struct SqliteCommand<'conn> {
    conn: &'conn rusqlite::Connection,
    stmt: Statement<'conn>,
}

impl PreparedCommand for SqliteCommand<'_> {
    type Cursor<'cmd>
        = SqliteCursor<'cmd>
    where
        Self: 'cmd;

    fn bind(&mut self, position: usize, value: &SqlValue) -> Result<(), SqlChainError> {
        self.stmt
            .raw_bind_parameter(position, sql_value_to_sqlite_value(value))?;
        Ok(())
    }

    /// Statements that produce rows (`SELECT`, `RETURNING`) are stepped to completion and the
    /// rows discarded; a read-only statement reports zero affected rows.
    fn execute_mutation(&mut self) -> Result<usize, SqlChainError> {
        if self.stmt.column_count() == 0 {
            return Ok(self.stmt.raw_execute()?);
        }
        let mut rows = self.stmt.raw_query();
        let mut discarded = 0usize;
        while rows.next()?.is_some() {
            discarded += 1;
        }
        drop(rows);
        tracing::debug!(discarded, "mutation produced rows");
        if self.stmt.readonly() {
            return Ok(0);
        }
        usize::try_from(self.conn.changes()).map_err(|e| {
            SqlChainError::StatementError(format!("change count does not fit usize: {e}"))
        })
    }

    fn execute_query(&mut self) -> Result<SqliteCursor<'_>, SqlChainError> {
        let columns: Vec<String> = self
            .stmt
            .column_names()
            .iter()
            .map(std::string::ToString::to_string)
            .collect();
        let rows = self.stmt.raw_query();
        Ok(SqliteCursor {
            columns,
            rows,
            current: Vec::new(),
        })
    }

    fn close(self) -> Result<(), SqlChainError> {
        self.stmt.finalize().map_err(|e| {
            SqlChainError::ResourceError(format!("failed to finalize SQLite statement: {e}"))
        })
    }
}

/// Row cursor over a running `rusqlite` query.
///
/// Each step copies the row into `current`, so values stay readable until the next
/// [`Cursor::advance`].
pub struct SqliteCursor<'cmd> {
    columns: Vec<String>,
    rows: rusqlite::Rows<'cmd>,
    current: Vec<SqlValue>,
}

impl Cursor for SqliteCursor<'_> {
    fn column_names(&self) -> &[String] {
        &self.columns
    }

    fn advance(&mut self) -> Result<bool, SqlChainError> {
        let Some(row) = self.rows.next()? else {
            self.current.clear();
            return Ok(false);
        };
        sqlite_read_row(row, self.columns.len(), &mut self.current)?;
        Ok(true)
    }

    fn value_at(&self, column: usize) -> Result<SqlValue, SqlChainError> {
        self.current.get(column).cloned().ok_or_else(|| {
            SqlChainError::StatementError(format!(
                "no value at column {column} (row has {} values)",
                self.current.len()
            ))
        })
    }

    fn close(self) -> Result<(), SqlChainError> {
        drop(self.rows);
        Ok(())
    }
}
