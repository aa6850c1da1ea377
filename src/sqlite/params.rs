use rusqlite::types::Value;

use crate::types::SqlValue;

/// Convert a single `SqlValue` to a rusqlite `Value`.
///
/// Booleans are stored the way SQLite stores them, as `0`/`1` integers.
#[must_use]
pub fn sql_value_to_sqlite_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Int(i) => Value::Integer(*i),
        SqlValue::Float(f) => Value::Real(*f),
        SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
        SqlValue::Null => Value::Null,
        SqlValue::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}
