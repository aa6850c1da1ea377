use sql_chain::prelude::*;
use sql_chain::test_utils::{Event, RecordingConnection};

fn keep_open(connection: RecordingConnection) -> StatementBuilder<RecordingConnection> {
    StatementBuilder::new(connection).close_on_complete(false)
}

#[test]
fn insert_binds_each_object_in_field_order() -> Result<(), SqlChainError> {
    let connection = RecordingConnection::new().with_rows_affected(1);
    let journal = connection.journal();
    let mut builder = keep_open(connection);

    assert!(builder.insert("t", ["a", "b"], sql_values!["x", 1])?);

    assert_eq!(journal.prepared_sql(), ["INSERT INTO t(a, b) VALUES (?, ?);"]);
    assert_eq!(
        journal.binds(),
        [(1, SqlValue::from("x")), (2, SqlValue::Int(1))]
    );
    assert_eq!(builder.rows_affected(), Some(1));
    Ok(())
}

#[test]
fn select_with_condition_builds_sql_and_values() -> Result<(), SqlChainError> {
    let connection = RecordingConnection::new().with_result(&["id"], vec![vec![SqlValue::Int(5)]]);
    let journal = connection.journal();
    let mut builder = keep_open(connection);

    builder.select_from("t").where_().param("id").equals_value(5);
    assert_eq!(builder.sql(), "SELECT * FROM t WHERE id = ? ");
    assert_eq!(builder.param_names(), ["id"]);
    assert_eq!(builder.bound_values(), [SqlValue::Int(5)]);
    assert_eq!(builder.command_kind(), CommandKind::Select);

    let rows = builder.fetch()?;
    assert_eq!(rows.get("id").unwrap(), [SqlValue::Int(5)]);
    assert_eq!(journal.prepared_sql(), ["SELECT * FROM t WHERE id = ? ;"]);
    assert_eq!(journal.binds(), [(1, SqlValue::Int(5))]);

    assert_eq!(builder.sql(), "");
    assert!(builder.param_names().is_empty());
    assert!(builder.bound_values().is_empty());
    assert_eq!(builder.command_kind(), CommandKind::Unset);
    Ok(())
}

#[test]
fn chained_conditions_keep_call_order() {
    let mut builder = keep_open(RecordingConnection::new());

    builder
        .select_from("t")
        .where_()
        .param("a")
        .bigger_than(1)
        .and()
        .param("b")
        .smaller_than_or_equals(2)
        .or()
        .param("c")
        .different_from("z");

    assert_eq!(
        builder.sql(),
        "SELECT * FROM t WHERE a > ? AND b <= ? OR c <> ? "
    );
    assert_eq!(builder.param_names(), ["a", "b", "c"]);
    assert_eq!(
        builder.bound_values(),
        [SqlValue::Int(1), SqlValue::Int(2), SqlValue::from("z")]
    );
}

#[test]
fn like_values_are_wrapped_before_binding() -> Result<(), SqlChainError> {
    let connection = RecordingConnection::new().with_result(&["name"], vec![]);
    let journal = connection.journal();
    let mut builder = keep_open(connection);

    builder.select_from("t").where_().param("name").like_left("ab").fetch()?;
    builder.select_from("t").where_().param("name").like_right("ab").fetch()?;
    builder.select_from("t").where_().param("name").like("ab").fetch()?;

    assert_eq!(
        journal.binds(),
        [
            (1, SqlValue::from("%ab")),
            (1, SqlValue::from("ab%")),
            (1, SqlValue::from("%ab%")),
        ]
    );
    assert!(journal.prepared_sql().iter().all(|sql| sql.ends_with("name LIKE ? ;")));
    Ok(())
}

#[test]
fn default_fetch_releases_cursor_command_then_connection() -> Result<(), SqlChainError> {
    let connection = RecordingConnection::new().with_result(&["id"], vec![vec![SqlValue::Int(1)]]);
    let journal = connection.journal();
    let mut builder = StatementBuilder::new(connection);

    builder.select_from("t").fetch()?;

    assert_eq!(
        journal.closes(),
        [Event::CloseCursor, Event::CloseCommand, Event::CloseConnection]
    );
    assert!(builder.is_closed());
    assert_eq!(builder.state(), CommandState::Closed);
    Ok(())
}

#[test]
fn failing_cursor_close_still_releases_everything() {
    let connection = RecordingConnection::new()
        .with_result(&["id"], vec![vec![SqlValue::Int(1)]])
        .failing_cursor_close()
        .failing_connection_close();
    let journal = connection.journal();
    let mut builder = StatementBuilder::new(connection);

    let err = builder.select_from("t").fetch().unwrap_err();

    match err {
        SqlChainError::ResourceError(msg) => assert_eq!(msg, "cursor close failed"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        journal.closes(),
        [Event::CloseCursor, Event::CloseCommand, Event::CloseConnection]
    );
    assert!(builder.is_closed());
}

#[test]
fn execution_error_wins_over_release_errors() {
    let connection = RecordingConnection::new()
        .failing_execute("boom")
        .failing_command_close();
    let journal = connection.journal();
    let mut builder = StatementBuilder::new(connection);

    let err = builder
        .delete_from("t")
        .where_()
        .param("id")
        .equals_value(3)
        .execute()
        .unwrap_err();

    match err {
        SqlChainError::StatementError(msg) => assert_eq!(msg, "boom"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        journal.closes(),
        [Event::CloseCommand, Event::CloseConnection]
    );
    assert_eq!(builder.rows_affected(), None);
    assert!(builder.param_names().is_empty());
    assert!(builder.bound_values().is_empty());
}

#[test]
fn stale_condition_values_are_not_bound_on_insert() -> Result<(), SqlChainError> {
    let connection = RecordingConnection::new();
    let journal = connection.journal();
    let mut builder = keep_open(connection);

    // abandoned without a terminal call
    builder.select_from("t").where_().param("id").equals_value(99);
    builder.insert("t", ["a"], sql_values!["only"])?;

    assert_eq!(journal.binds(), [(1, SqlValue::from("only"))]);
    Ok(())
}

#[test]
fn param_without_comparison_prepares_nothing() {
    let connection = RecordingConnection::new();
    let journal = connection.journal();
    let mut builder = keep_open(connection);

    builder.select_from("t").where_().param("id");
    let err = builder.fetch().unwrap_err();

    assert!(matches!(err, SqlChainError::StatementError(_)));
    assert!(journal.prepared_sql().is_empty());
    assert!(builder.param_names().is_empty());
    assert!(!builder.is_closed());
}

#[test]
fn null_is_bound_like_any_other_value() -> Result<(), SqlChainError> {
    let connection = RecordingConnection::new();
    let journal = connection.journal();
    let mut builder = keep_open(connection);

    builder.insert("t", ["a", "b"], sql_values![None::<i64>, 2])?;

    assert_eq!(journal.binds(), [(1, SqlValue::Null), (2, SqlValue::Int(2))]);
    Ok(())
}

#[test]
fn terminal_call_on_closed_builder_is_a_connection_error() -> Result<(), SqlChainError> {
    let connection = RecordingConnection::new();
    let journal = connection.journal();
    let mut builder = keep_open(connection);

    builder.close()?;
    let err = builder
        .select_from("t")
        .where_()
        .param("id")
        .equals_value(5)
        .fetch()
        .unwrap_err();

    assert!(matches!(err, SqlChainError::ConnectionError(_)));
    assert!(journal.prepared_sql().is_empty());
    assert_eq!(builder.sql(), "");
    assert!(builder.param_names().is_empty());
    assert!(builder.bound_values().is_empty());
    assert_eq!(builder.command_kind(), CommandKind::Unset);

    builder.delete_from("t").where_().param("id").equals_value(5);
    let err = builder.execute().unwrap_err();
    assert!(matches!(err, SqlChainError::ConnectionError(_)));
    assert!(builder.param_names().is_empty());
    assert!(builder.bound_values().is_empty());

    let err = builder.insert("t", ["a"], sql_values![1]).unwrap_err();
    assert!(matches!(err, SqlChainError::ConnectionError(_)));
    assert_eq!(builder.sql(), "");
    assert_eq!(builder.state(), CommandState::Closed);
    Ok(())
}

#[test]
fn close_is_idempotent_and_drop_closes() -> Result<(), SqlChainError> {
    let connection = RecordingConnection::new();
    let journal = connection.journal();
    let mut builder = keep_open(connection);
    builder.close()?;
    builder.close()?;
    drop(builder);
    assert_eq!(journal.closes(), [Event::CloseConnection]);

    let connection = RecordingConnection::new();
    let journal = connection.journal();
    drop(keep_open(connection));
    assert_eq!(journal.closes(), [Event::CloseConnection]);
    Ok(())
}

#[test]
fn failing_connection_close_is_reported_once() {
    let connection = RecordingConnection::new().failing_connection_close();
    let mut builder = keep_open(connection);

    let err = builder.close().unwrap_err();
    assert!(matches!(err, SqlChainError::ResourceError(_)));
    assert!(builder.is_closed());
    assert!(builder.close().is_ok());
}

#[test]
fn results_serialize_in_column_order() -> Result<(), Box<dyn std::error::Error>> {
    let connection = RecordingConnection::new().with_result(
        &["name", "id"],
        vec![
            vec![SqlValue::from("a"), SqlValue::Int(1)],
            vec![SqlValue::Null, SqlValue::Int(2)],
        ],
    );
    let mut builder = StatementBuilder::new(connection);

    let rows = builder.select_from("t").fetch()?;
    let json = serde_json::to_string(&rows)?;
    assert_eq!(json, r#"{"name":["a",null],"id":[1,2]}"#);
    Ok(())
}

#[test]
fn mutation_emits_prepare_bind_execute_then_release() -> Result<(), SqlChainError> {
    let connection = RecordingConnection::new().with_rows_affected(2);
    let journal = connection.journal();
    let mut builder = keep_open(connection);

    builder.select_from("t").fetch()?;
    journal.clear();
    assert!(journal.events().is_empty());

    builder.delete_from("t").where_().param("id").bigger_than(3).execute()?;

    assert_eq!(
        journal.events(),
        [
            Event::Prepare("DELETE FROM t WHERE id > ? ".to_string()),
            Event::Bind(1, SqlValue::Int(3)),
            Event::ExecuteMutation,
            Event::CloseCommand,
        ]
    );
    assert_eq!(builder.rows_affected(), Some(2));
    Ok(())
}
