//! Interpreter configuration.

use serde::{Deserialize, Serialize};

/// Errors raised while loading [`InterpreterOptions`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid interpreter options: {0}")]
    Json(#[from] serde_json::Error),

    /// The synthetic name prefix is empty or not a plain identifier.
    #[error("synthetic prefix {0:?} must be non-empty and contain only ASCII letters, digits and '_'")]
    InvalidPrefix(String),
}

/// Options for [`crate::PostgresInterpreter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterOptions {
    /// Render `VIRTUAL` after virtual generated columns (PostgreSQL 18+).
    pub explicit_virtual_storage: bool,
    /// Prefix for synthesized CTE and identity-alias names.
    pub synthetic_prefix: String,
    /// Schema whose name is left out of qualified names.
    pub default_schema: Option<String>,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self {
            explicit_virtual_storage: false,
            synthetic_prefix: "__sw".to_string(),
            default_schema: None,
        }
    }
}

impl InterpreterOptions {
    /// Creates options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether virtual generated columns render their storage keyword.
    #[must_use]
    pub const fn explicit_virtual_storage(mut self, explicit: bool) -> Self {
        self.explicit_virtual_storage = explicit;
        self
    }

    /// Sets the synthetic name prefix.
    #[must_use]
    pub fn synthetic_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.synthetic_prefix = prefix.into();
        self
    }

    /// Sets the schema omitted from qualified names.
    #[must_use]
    pub fn default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }

    /// Parses options from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input and
    /// [`ConfigError::InvalidPrefix`] for an unusable synthetic prefix.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Checks that the options can be used for rendering.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPrefix`] for an unusable synthetic prefix.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = &self.synthetic_prefix;
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ConfigError::InvalidPrefix(prefix.clone()));
        }
        Ok(())
    }
}
