//! Configuration Error Types

use thiserror::Error;

/// Configuration-related errors with detailed context
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The environment could not be read or deserialized
    #[error("Failed to load configuration from {source_name}: {error}")]
    Load { source_name: String, error: String },

    /// A value was present but could not be used
    #[error("Invalid value '{value}' for '{field}': {context}")]
    InvalidValue {
        field: String,
        value: String,
        context: String,
    },
}

impl ConfigurationError {
    pub fn load<S: Into<String>, E: std::fmt::Display>(source_name: S, error: E) -> Self {
        Self::Load {
            source_name: source_name.into(),
            error: error.to_string(),
        }
    }

    pub fn invalid_value<F: Into<String>, V: Into<String>, C: Into<String>>(
        field: F,
        value: V,
        context: C,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            context: context.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigurationError {
    fn from(error: config::ConfigError) -> Self {
        Self::load("environment", error)
    }
}

pub type ConfigResult<T> = Result<T, ConfigurationError>;
