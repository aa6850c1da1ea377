use std::fmt;

use crate::error::SqlChainError;

/// Resources a terminal call releases, in release order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resource {
    Cursor,
    Command,
    Connection,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Cursor => "cursor",
            Resource::Command => "command",
            Resource::Connection => "connection",
        })
    }
}

/// Collects the outcome of each close so every resource gets its close attempt.
///
/// Only the first failure is kept; the rest are logged.
#[derive(Debug, Default)]
pub(crate) struct Release {
    first_error: Option<SqlChainError>,
}

impl Release {
    pub(crate) fn attempt(&mut self, resource: Resource, result: Result<(), SqlChainError>) {
        let Err(err) = result else {
            tracing::trace!(%resource, "released");
            return;
        };
        tracing::warn!(%resource, error = %err, "failed to release");
        if self.first_error.is_none() {
            self.first_error = Some(err);
        }
    }

    /// An error from the operation itself wins over release errors.
    pub(crate) fn finish<T>(self, outcome: Result<T, SqlChainError>) -> Result<T, SqlChainError> {
        let value = outcome?;
        match self.first_error {
            Some(err) => Err(err),
            None => Ok(value),
        }
    }
}
