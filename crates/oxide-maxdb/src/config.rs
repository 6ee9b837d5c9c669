//! Connection configuration consumed by the adapter.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AdapterError, Result};

fn default_prepared_statements() -> bool {
    true
}

/// Adapter configuration.
///
/// `schema` names the user schema explicitly; without it the login
/// `username` doubles as the schema name, which is the usual MaxDB setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Explicit schema name.
    #[serde(default)]
    pub schema: Option<String>,
    /// Login user, used as schema when `schema` is not set.
    #[serde(default)]
    pub username: Option<String>,
    /// Execute inserts as prepared statements with bound parameters.
    #[serde(default = "default_prepared_statements")]
    pub prepared_statements: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            schema: None,
            username: None,
            prepared_statements: true,
        }
    }
}

impl AdapterConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the explicit schema.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Sets the login user.
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Enables or disables prepared statements.
    #[must_use]
    pub fn prepared_statements(mut self, enabled: bool) -> Self {
        self.prepared_statements = enabled;
        self
    }

    /// Parses a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Rejects a blank schema, and a blank user name when it would stand in
    /// for the schema.
    pub fn validate(&self) -> Result<()> {
        if is_blank(self.schema.as_deref()) {
            return Err(AdapterError::Config(String::from("'schema' must not be blank")));
        }
        if self.schema.is_none() && is_blank(self.username.as_deref()) {
            return Err(AdapterError::Config(String::from("'username' must not be blank")));
        }
        Ok(())
    }

    /// Returns the schema metadata queries are pinned to. Blank names are
    /// ignored.
    #[must_use]
    pub fn resolved_schema(&self) -> Option<&str> {
        [self.schema.as_deref(), self.username.as_deref()]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().is_empty())
}
