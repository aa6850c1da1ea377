use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::SqlChainError;

pub const URL_KEY: &str = "connection.url";
pub const USER_KEY: &str = "connection.user";
pub const PASSWORD_KEY: &str = "connection.password";
pub const CLOSE_ON_COMPLETE_KEY: &str = "connection.close_on_complete";

/// Settings for opening the connection a builder owns.
///
/// `close_on_complete` controls whether a terminal call (`execute`, `values`, `fetch`) also closes
/// the connection once its command has been released. It defaults to `true`, which makes a builder
/// single-use; turn it off to run several commands on one connection.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub close_on_complete: bool,
}

impl ConnectionConfig {
    #[must_use]
    pub fn new(url: String) -> Self {
        Self {
            url,
            user: String::new(),
            password: String::new(),
            close_on_complete: true,
        }
    }

    #[must_use]
    pub fn builder(url: impl Into<String>) -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::new(url.into())
    }

    /// Load settings from a `key=value` properties file.
    ///
    /// Values are taken as written: `$` is not expanded and spaces inside a value are kept. `#` and
    /// `!` start comment lines, and `key: value` is accepted as well as `key=value`.
    ///
    /// ```rust
    /// # use sql_chain::ConnectionConfig;
    /// # fn demo() -> Result<(), sql_chain::SqlChainError> {
    /// let config = ConnectionConfig::from_properties_file("db.properties")?;
    /// # let _ = config;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns `SqlChainError::ConfigError` if the file is missing or unreadable, or if a required
    /// key is absent.
    pub fn from_properties_file(path: impl AsRef<Path>) -> Result<Self, SqlChainError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SqlChainError::ConfigError(format!(
                "properties file not found: {}",
                path.display()
            )));
        }

        let file = File::open(path).map_err(|e| {
            SqlChainError::ConfigError(format!(
                "cannot open properties file {}: {e}",
                path.display()
            ))
        })?;
        let properties = java_properties::read(BufReader::new(file))?;
        tracing::debug!(path = %path.display(), keys = properties.len(), "loaded properties");
        Self::from_properties(&properties)
    }

    /// Build settings from an already loaded key-value map.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConfigError` if `connection.url`, `connection.user` or
    /// `connection.password` is missing, if the url is blank, or if
    /// `connection.close_on_complete` is not a boolean.
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self, SqlChainError> {
        let required = |key: &str| {
            properties
                .get(key)
                .cloned()
                .ok_or_else(|| SqlChainError::ConfigError(format!("missing property `{key}`")))
        };

        let url = required(URL_KEY)?;
        if url.trim().is_empty() {
            return Err(SqlChainError::ConfigError(format!(
                "property `{URL_KEY}` is blank"
            )));
        }

        let close_on_complete = match properties.get(CLOSE_ON_COMPLETE_KEY) {
            None => true,
            Some(raw) => parse_bool(raw).ok_or_else(|| {
                SqlChainError::ConfigError(format!(
                    "property `{CLOSE_ON_COMPLETE_KEY}` must be true or false, got `{raw}`"
                ))
            })?,
        };

        Ok(Self {
            url,
            user: required(USER_KEY)?,
            password: required(PASSWORD_KEY)?,
            close_on_complete,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("close_on_complete", &self.close_on_complete)
            .finish()
    }
}

/// Fluent builder for [`ConnectionConfig`].
#[derive(Debug, Clone)]
pub struct ConnectionConfigBuilder {
    config: ConnectionConfig,
}

impl ConnectionConfigBuilder {
    #[must_use]
    pub fn new(url: String) -> Self {
        Self {
            config: ConnectionConfig::new(url),
        }
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.config.user = user.into();
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    #[must_use]
    pub fn close_on_complete(mut self, close_on_complete: bool) -> Self {
        self.config.close_on_complete = close_on_complete;
        self
    }

    #[must_use]
    pub fn finish(self) -> ConnectionConfig {
        self.config
    }
}
