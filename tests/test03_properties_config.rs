#![cfg(feature = "sqlite")]
use std::io::Write;

use sql_chain::prelude::*;
use tempfile::{NamedTempFile, TempDir};

fn properties_file(contents: &str) -> Result<NamedTempFile, Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[test]
fn loads_every_key() -> Result<(), Box<dyn std::error::Error>> {
    let file = properties_file(
        "# shop database\n\
         connection.url=sqlite://shop.db\n\
         connection.user=clerk\n\
         connection.password=s3cret\n\
         connection.close_on_complete=false\n",
    )?;

    let config = ConnectionConfig::from_properties_file(file.path())?;

    assert_eq!(config.url, "sqlite://shop.db");
    assert_eq!(config.user, "clerk");
    assert_eq!(config.password, "s3cret");
    assert!(!config.close_on_complete);
    assert!(!format!("{config:?}").contains("s3cret"));
    Ok(())
}

#[test]
fn values_are_kept_verbatim() -> Result<(), Box<dyn std::error::Error>> {
    let file = properties_file(
        "connection.url=sqlite://$HOME/shop.db\n\
         connection.user: night clerk\n\
         connection.password=pa$word with spaces\n",
    )?;

    let config = ConnectionConfig::from_properties_file(file.path())?;

    assert_eq!(config.url, "sqlite://$HOME/shop.db");
    assert_eq!(config.user, "night clerk");
    assert_eq!(config.password, "pa$word with spaces");
    Ok(())
}

#[test]
fn close_on_complete_defaults_to_true() -> Result<(), Box<dyn std::error::Error>> {
    let file = properties_file(
        "connection.url=:memory:\nconnection.user=\nconnection.password=\n",
    )?;

    let config = ConnectionConfig::from_properties_file(file.path())?;

    assert!(config.close_on_complete);
    assert_eq!(config.user, "");
    Ok(())
}

#[test]
fn missing_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let err = ConnectionConfig::from_properties_file(dir.path().join("absent.properties"))
        .unwrap_err();
    assert!(matches!(err, SqlChainError::ConfigError(_)));

    let err = StatementBuilder::from_properties_file(dir.path().join("absent.properties"))
        .unwrap_err();
    assert!(matches!(err, SqlChainError::ConfigError(_)));
}

#[test]
fn missing_key_is_a_config_error() -> Result<(), Box<dyn std::error::Error>> {
    let file = properties_file("connection.url=:memory:\nconnection.user=clerk\n")?;

    let err = ConnectionConfig::from_properties_file(file.path()).unwrap_err();

    match err {
        SqlChainError::ConfigError(msg) => assert!(msg.contains("connection.password"), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn invalid_flag_is_a_config_error() -> Result<(), Box<dyn std::error::Error>> {
    let file = properties_file(
        "connection.url=:memory:\n\
         connection.user=\n\
         connection.password=\n\
         connection.close_on_complete=sometimes\n",
    )?;

    let err = ConnectionConfig::from_properties_file(file.path()).unwrap_err();
    assert!(matches!(err, SqlChainError::ConfigError(_)));
    Ok(())
}

#[test]
fn builder_from_properties_opens_the_database() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("shop.db");
    let file = properties_file(&format!(
        "connection.url=sqlite://{}\n\
         connection.user=clerk\n\
         connection.password=s3cret\n\
         connection.close_on_complete=false\n",
        db_path.display()
    ))?;

    let mut builder = StatementBuilder::from_properties_file(file.path())?;
    builder
        .connection()
        .execute_batch("CREATE TABLE products (name TEXT, price REAL)")?;
    builder.insert("products", ["name", "price"], sql_values!["pen", 2.5])?;
    let rows = builder.select_from("products").fetch()?;
    assert_eq!(rows.get("name").unwrap(), [SqlValue::from("pen")]);
    builder.close()?;

    // the data is on disk, visible to a fresh connection
    let config = ConnectionConfig::builder(db_path.display().to_string()).finish();
    let mut reopened = StatementBuilder::connect(&config)?;
    let rows = reopened.select_from("products").fetch()?;
    assert_eq!(rows.get("price").unwrap(), [SqlValue::Float(2.5)]);
    assert!(reopened.is_closed());
    Ok(())
}

#[test]
fn unreachable_database_is_a_connection_error() {
    let dir = TempDir::new().unwrap();
    let config = ConnectionConfig::new(
        dir.path()
            .join("no/such/dir/shop.db")
            .display()
            .to_string(),
    );

    let err = StatementBuilder::connect(&config).unwrap_err();
    assert!(matches!(err, SqlChainError::ConnectionError(_)));
}
