//! Error types for the Cinescore data layer.
//!
//! Request-path operations never surface these to callers: lifecycle managers
//! resolve failures to a disabled client and the cache façade resolves them to
//! a miss or a no-op. The types exist so that construction and backend helpers
//! can return an explicit result that the boundary then converts.

use crate::cache::CacheError;
use crate::config::ConfigurationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataLayerError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Cache error: {0}")]
    Cache(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Version guard failed: {0}")]
    VersionGuard(String),
}

impl From<ConfigurationError> for DataLayerError {
    fn from(error: ConfigurationError) -> Self {
        DataLayerError::Configuration(error.to_string())
    }
}

impl From<CacheError> for DataLayerError {
    fn from(error: CacheError) -> Self {
        DataLayerError::Cache(error.to_string())
    }
}

impl From<sqlx::Error> for DataLayerError {
    fn from(error: sqlx::Error) -> Self {
        DataLayerError::Database(error.to_string())
    }
}

impl From<serde_json::Error> for DataLayerError {
    fn from(error: serde_json::Error) -> Self {
        DataLayerError::Serialization(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataLayerError>;

/// Why a connector could not produce a client handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// Settings were present but unusable (malformed URL, bad token).
    #[error("Invalid connection settings: {0}")]
    InvalidSettings(String),

    /// The restricted runtime does not provide the transport this client needs.
    #[error("Realtime transport unavailable: {0}")]
    TransportUnavailable(String),

    /// The underlying client constructor failed.
    #[error("Client construction failed: {0}")]
    Construction(String),
}

impl From<sqlx::Error> for ConnectError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Configuration(inner) => ConnectError::InvalidSettings(inner.to_string()),
            other => ConnectError::Construction(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_conversion() {
        let error: DataLayerError = CacheError::BackendError("boom".to_string()).into();
        assert!(matches!(error, DataLayerError::Cache(_)));
        assert!(error.to_string().contains("boom"));
    }

    #[test]
    fn test_sqlx_configuration_error_maps_to_invalid_settings() {
        let error: ConnectError = sqlx::Error::Configuration("bad url".into()).into();
        assert_eq!(error, ConnectError::InvalidSettings("bad url".to_string()));
    }

    #[test]
    fn test_connect_error_display() {
        let error = ConnectError::TransportUnavailable("no websocket".to_string());
        assert_eq!(
            error.to_string(),
            "Realtime transport unavailable: no websocket"
        );
    }
}
