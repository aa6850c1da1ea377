use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::driver::Cursor;
use crate::error::SqlChainError;
use crate::types::SqlValue;

/// Column-oriented query result: each column name maps to the values of that column across all
/// rows, in cursor order.
///
/// Every queried column is present even when no row matched, in which case its sequence is empty.
/// When a query yields the same column name twice, the first occurrence is kept and the later ones
/// are dropped, so keys stay unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultColumns {
    names: Vec<String>,
    columns: Vec<Vec<SqlValue>>,
    // name -> position in `names`/`columns`
    index: HashMap<String, usize>,
}

impl ResultColumns {
    /// Seed one empty sequence per distinct column name.
    #[must_use]
    pub fn with_columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut result = Self::default();
        for name in names {
            let name = name.into();
            if result.index.contains_key(&name) {
                continue;
            }
            result.index.insert(name.clone(), result.names.len());
            result.names.push(name);
            result.columns.push(Vec::new());
        }
        result
    }

    /// Column names in query order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Values of `column`, or `None` if the query did not return that column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&[SqlValue]> {
        self.index.get(column).map(|&idx| self.columns[idx].as_slice())
    }

    #[must_use]
    pub fn contains_column(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    /// Number of materialized rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SqlValue])> {
        self.names
            .iter()
            .zip(&self.columns)
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Give up the ordering and return the plain mapping.
    #[must_use]
    pub fn into_map(self) -> HashMap<String, Vec<SqlValue>> {
        self.names.into_iter().zip(self.columns).collect()
    }

    fn push(&mut self, slot: usize, value: SqlValue) {
        self.columns[slot].push(value);
    }
}

impl Serialize for ResultColumns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.names.len()))?;
        for (name, values) in self.iter() {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

/// Drain `cursor` into a [`ResultColumns`].
///
/// # Errors
/// Returns `SqlChainError` if stepping the cursor or reading a value fails.
pub fn materialize<C: Cursor>(cursor: &mut C) -> Result<ResultColumns, SqlChainError> {
    let cursor_columns = cursor.column_names().to_vec();
    let mut result = ResultColumns::with_columns(cursor_columns.iter().cloned());

    // Cursor column -> result slot; duplicates after the first occurrence have no slot.
    let mut claimed = vec![false; result.names.len()];
    let targets: Vec<Option<usize>> = cursor_columns
        .iter()
        .enumerate()
        .map(|(column, name)| {
            let slot = result.index[name.as_str()];
            if claimed[slot] {
                tracing::debug!(column, name = %name, "dropping duplicate result column");
                None
            } else {
                claimed[slot] = true;
                Some(slot)
            }
        })
        .collect();

    while cursor.advance()? {
        for (column, target) in targets.iter().enumerate() {
            if let Some(slot) = *target {
                result.push(slot, cursor.value_at(column)?);
            }
        }
    }

    tracing::debug!(
        columns = result.names.len(),
        rows = result.row_count(),
        "materialized result"
    );
    Ok(result)
}
