use crate::driver::PreparedCommand;
use crate::error::SqlChainError;
use crate::placeholders::count_placeholders;
use crate::types::SqlValue;

/// Bind `values` to slots `1..=values.len()` of `command`, strictly left to right.
///
/// Binding the same sequence again assigns the same values to the same slots.
///
/// # Errors
/// Returns the driver's error for the first slot it rejects; later slots are left untouched.
pub fn bind_values<P: PreparedCommand>(
    command: &mut P,
    values: &[SqlValue],
) -> Result<(), SqlChainError> {
    for (idx, value) in values.iter().enumerate() {
        let position = idx + 1;
        tracing::trace!(position, kind = value.type_name(), "binding value");
        command.bind(position, value)?;
    }
    Ok(())
}

/// Refuse to send a statement whose placeholder count differs from the number of values.
pub(crate) fn check_alignment(sql: &str, values: &[SqlValue]) -> Result<(), SqlChainError> {
    let slots = count_placeholders(sql);
    if slots == values.len() {
        Ok(())
    } else {
        Err(SqlChainError::StatementError(format!(
            "statement has {slots} placeholder(s) but {} value(s) were supplied: {sql}",
            values.len()
        )))
    }
}

/// Every comparison must follow exactly one `param`, so names and values pair up 1:1.
pub(crate) fn check_param_pairs(params: &[String], values: &[SqlValue]) -> Result<(), SqlChainError> {
    if params.len() == values.len() {
        Ok(())
    } else {
        Err(SqlChainError::StatementError(format!(
            "{} parameter name(s) {params:?} but {} value(s); each comparison needs one param()",
            params.len(),
            values.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Cursor;

    #[derive(Default)]
    struct SlotRecorder {
        slots: Vec<Option<SqlValue>>,
    }

    struct NoRows;

    impl Cursor for NoRows {
        fn column_names(&self) -> &[String] {
            &[]
        }
        fn advance(&mut self) -> Result<bool, SqlChainError> {
            Ok(false)
        }
        fn value_at(&self, _column: usize) -> Result<SqlValue, SqlChainError> {
            Err(SqlChainError::StatementError("no rows".into()))
        }
        fn close(self) -> Result<(), SqlChainError> {
            Ok(())
        }
    }

    impl PreparedCommand for SlotRecorder {
        type Cursor<'cmd> = NoRows;

        fn bind(&mut self, position: usize, value: &SqlValue) -> Result<(), SqlChainError> {
            if position == 0 || position > self.slots.len() {
                return Err(SqlChainError::StatementError(format!("no slot {position}")));
            }
            self.slots[position - 1] = Some(value.clone());
            Ok(())
        }
        fn execute_mutation(&mut self) -> Result<usize, SqlChainError> {
            Ok(0)
        }
        fn execute_query(&mut self) -> Result<NoRows, SqlChainError> {
            Ok(NoRows)
        }
        fn close(self) -> Result<(), SqlChainError> {
            Ok(())
        }
    }

    fn recorder(slots: usize) -> SlotRecorder {
        SlotRecorder {
            slots: vec![None; slots],
        }
    }

    #[test]
    fn binds_in_input_order() {
        let values = crate::sql_values!["x", 1, 2.5, true, None::<i32>];
        let mut command = recorder(values.len());
        bind_values(&mut command, &values).unwrap();
        let bound: Vec<SqlValue> = command.slots.into_iter().map(Option::unwrap).collect();
        assert_eq!(bound, values);
    }

    #[test]
    fn rebinding_is_idempotent() {
        let values = crate::sql_values![7, "seven"];
        let mut command = recorder(2);
        bind_values(&mut command, &values).unwrap();
        let first = command.slots.clone();
        bind_values(&mut command, &values).unwrap();
        assert_eq!(command.slots, first);
    }

    #[test]
    fn surplus_value_is_rejected_by_the_driver() {
        let mut command = recorder(1);
        let err = bind_values(&mut command, &crate::sql_values![1, 2]).unwrap_err();
        assert!(matches!(err, SqlChainError::StatementError(_)));
    }

    #[test]
    fn alignment_counts_placeholders() {
        assert!(check_alignment("SELECT * FROM t WHERE id = ? ", &crate::sql_values![5]).is_ok());
        let err = check_alignment("SELECT * FROM t WHERE id = ? ", &[]).unwrap_err();
        assert!(matches!(err, SqlChainError::StatementError(msg) if msg.contains("1 placeholder")));
    }

    #[test]
    fn param_pairs_must_match() {
        assert!(check_param_pairs(&["id".to_string()], &crate::sql_values![1]).is_ok());
        assert!(check_param_pairs(&[], &crate::sql_values![1]).is_err());
    }
}
