use std::cell::RefCell;
use std::rc::Rc;

use crate::driver::{Connection, Cursor, PreparedCommand};
use crate::error::SqlChainError;
use crate::placeholders::count_placeholders;
use crate::types::SqlValue;

/// One driver call as seen by [`RecordingConnection`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Prepare(String),
    Bind(usize, SqlValue),
    ExecuteMutation,
    ExecuteQuery,
    CloseCursor,
    CloseCommand,
    CloseConnection,
}

/// Shared log of [`Event`]s; clones observe the same log, so a test can keep one after the
/// connection has moved into a builder.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Event>>>);

impl Journal {
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    /// SQL text of every prepared command, in order.
    #[must_use]
    pub fn prepared_sql(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Prepare(sql) => Some(sql.clone()),
                _ => None,
            })
            .collect()
    }

    /// `(slot, value)` pairs in bind order.
    #[must_use]
    pub fn binds(&self) -> Vec<(usize, SqlValue)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Bind(position, value) => Some((*position, value.clone())),
                _ => None,
            })
            .collect()
    }

    /// Only the close events, to check release order.
    #[must_use]
    pub fn closes(&self) -> Vec<Event> {
        self.0
            .borrow()
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    Event::CloseCursor | Event::CloseCommand | Event::CloseConnection
                )
            })
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }
}

#[derive(Debug, Clone, Default)]
struct Script {
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
    rows_affected: usize,
    fail_execute: Option<String>,
    fail_close_cursor: bool,
    fail_close_command: bool,
    fail_close_connection: bool,
}

/// Scripted [`Connection`]: queries return the configured rows, mutations report the configured
/// row count, and any close step can be told to fail.
///
/// Like a real driver, binding a slot the SQL does not have is an error.
#[derive(Debug, Default)]
pub struct RecordingConnection {
    journal: Journal,
    script: Script,
    closed: bool,
}

impl RecordingConnection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    /// Rows every query returns.
    #[must_use]
    pub fn with_result(mut self, columns: &[&str], rows: Vec<Vec<SqlValue>>) -> Self {
        self.script.columns = columns.iter().map(|c| (*c).to_string()).collect();
        self.script.rows = rows;
        self
    }

    #[must_use]
    pub fn with_rows_affected(mut self, rows_affected: usize) -> Self {
        self.script.rows_affected = rows_affected;
        self
    }

    /// Make every execution fail with a `StatementError` carrying `message`.
    #[must_use]
    pub fn failing_execute(mut self, message: &str) -> Self {
        self.script.fail_execute = Some(message.to_string());
        self
    }

    #[must_use]
    pub fn failing_cursor_close(mut self) -> Self {
        self.script.fail_close_cursor = true;
        self
    }

    #[must_use]
    pub fn failing_command_close(mut self) -> Self {
        self.script.fail_close_command = true;
        self
    }

    #[must_use]
    pub fn failing_connection_close(mut self) -> Self {
        self.script.fail_close_connection = true;
        self
    }
}

impl Connection for RecordingConnection {
    type Command<'conn> = RecordingCommand<'conn>;

    fn prepare(&mut self, sql: &str) -> Result<RecordingCommand<'_>, SqlChainError> {
        if self.closed {
            return Err(SqlChainError::ConnectionError(
                "recording connection is closed".into(),
            ));
        }
        self.journal.push(Event::Prepare(sql.to_string()));
        Ok(RecordingCommand {
            script: &self.script,
            journal: self.journal.clone(),
            slots: count_placeholders(sql),
        })
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) -> Result<(), SqlChainError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.journal.push(Event::CloseConnection);
        if self.script.fail_close_connection {
            Err(SqlChainError::ResourceError("connection close failed".into()))
        } else {
            Ok(())
        }
    }
}

pub struct RecordingCommand<'conn> {
    script: &'conn Script,
    journal: Journal,
    slots: usize,
}

impl RecordingCommand<'_> {
    fn check_execute(&self) -> Result<(), SqlChainError> {
        match &self.script.fail_execute {
            Some(message) => Err(SqlChainError::StatementError(message.clone())),
            None => Ok(()),
        }
    }
}

impl PreparedCommand for RecordingCommand<'_> {
    type Cursor<'cmd>
        = RecordingCursor<'cmd>
    where
        Self: 'cmd;

    fn bind(&mut self, position: usize, value: &SqlValue) -> Result<(), SqlChainError> {
        if position == 0 || position > self.slots {
            return Err(SqlChainError::StatementError(format!(
                "slot {position} out of range (statement has {} slots)",
                self.slots
            )));
        }
        self.journal.push(Event::Bind(position, value.clone()));
        Ok(())
    }

    fn execute_mutation(&mut self) -> Result<usize, SqlChainError> {
        self.journal.push(Event::ExecuteMutation);
        self.check_execute()?;
        Ok(self.script.rows_affected)
    }

    fn execute_query(&mut self) -> Result<RecordingCursor<'_>, SqlChainError> {
        self.journal.push(Event::ExecuteQuery);
        self.check_execute()?;
        Ok(RecordingCursor {
            columns: &self.script.columns,
            rows: &self.script.rows,
            position: None,
            journal: self.journal.clone(),
            fail_close: self.script.fail_close_cursor,
        })
    }

    fn close(self) -> Result<(), SqlChainError> {
        self.journal.push(Event::CloseCommand);
        if self.script.fail_close_command {
            Err(SqlChainError::ResourceError("command close failed".into()))
        } else {
            Ok(())
        }
    }
}

pub struct RecordingCursor<'cmd> {
    columns: &'cmd [String],
    rows: &'cmd [Vec<SqlValue>],
    position: Option<usize>,
    journal: Journal,
    fail_close: bool,
}

impl Cursor for RecordingCursor<'_> {
    fn column_names(&self) -> &[String] {
        self.columns
    }

    fn advance(&mut self) -> Result<bool, SqlChainError> {
        let next = self.position.map_or(0, |p| p + 1);
        self.position = Some(next);
        Ok(next < self.rows.len())
    }

    fn value_at(&self, column: usize) -> Result<SqlValue, SqlChainError> {
        self.position
            .and_then(|row| self.rows.get(row))
            .and_then(|row| row.get(column))
            .cloned()
            .ok_or_else(|| SqlChainError::StatementError(format!("no value at column {column}")))
    }

    fn close(self) -> Result<(), SqlChainError> {
        self.journal.push(Event::CloseCursor);
        if self.fail_close {
            Err(SqlChainError::ResourceError("cursor close failed".into()))
        } else {
            Ok(())
        }
    }
}
