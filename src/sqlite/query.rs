use rusqlite::types::ValueRef;

use crate::error::SqlChainError;
use crate::types::SqlValue;

/// Read column `idx` of `row` as a `SqlValue`.
///
/// Text that is not valid UTF-8 is a `StatementError` rather than being lossily replaced.
///
/// # Errors
///
/// Returns `SqlChainError` if the column does not exist or holds undecodable text.
pub fn sqlite_extract_value(row: &rusqlite::Row, idx: usize) -> Result<SqlValue, SqlChainError> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(i) => SqlValue::Int(i),
        ValueRef::Real(f) => SqlValue::Float(f),
        ValueRef::Text(bytes) => SqlValue::Text(
            std::str::from_utf8(bytes)
                .map_err(|e| {
                    SqlChainError::StatementError(format!("column {idx} is not valid UTF-8: {e}"))
                })?
                .to_owned(),
        ),
        ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
    })
}

/// Copy the first `width` columns of `row` into `into`, replacing its previous contents.
///
/// # Errors
///
/// Returns the first column that fails to read; `into` then holds only the columns before it.
pub fn sqlite_read_row(
    row: &rusqlite::Row,
    width: usize,
    into: &mut Vec<SqlValue>,
) -> Result<(), SqlChainError> {
    into.clear();
    for idx in 0..width {
        into.push(sqlite_extract_value(row, idx)?);
    }
    Ok(())
}
