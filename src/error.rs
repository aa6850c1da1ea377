use thiserror::Error;

/// Every failure the builder, its drivers and its configuration can report.
#[derive(Debug, Error)]
pub enum SqlChainError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Statement error: {0}")]
    StatementError(String),

    #[error("Resource error: {0}")]
    ResourceError(String),
}

impl From<java_properties::PropertiesError> for SqlChainError {
    fn from(err: java_properties::PropertiesError) -> Self {
        SqlChainError::ConfigError(format!("unreadable properties source: {err}"))
    }
}
