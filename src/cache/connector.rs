//! Connector building the shared cache client.

use super::errors::CacheError;
use super::providers::UpstashRestCache;
use super::traits::CacheService;
use crate::client::{ClientKind, ConnectContext, Connector};
use crate::config::{CacheCredentials, DataLayerConfig};
use crate::error::ConnectError;
use std::sync::Arc;
use std::time::Duration;

/// Credentials plus request timeout for the REST backend
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub credentials: CacheCredentials,
    pub request_timeout: Duration,
}

/// Builds the Redis REST cache client
///
/// The client holds no connection, so it is memoized once per process even
/// under restricted runtimes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheConnector;

impl Connector for CacheConnector {
    type Client = dyn CacheService;
    type Settings = CacheSettings;

    fn kind(&self) -> ClientKind {
        ClientKind::Cache
    }

    fn settings(&self, config: &DataLayerConfig) -> Option<CacheSettings> {
        config.cache_credentials().map(|credentials| CacheSettings {
            credentials,
            request_timeout: config.kv_request_timeout(),
        })
    }

    fn connect(
        &self,
        settings: CacheSettings,
        _context: ConnectContext<'_>,
    ) -> Result<Arc<dyn CacheService>, ConnectError> {
        let cache = UpstashRestCache::new(&settings.credentials, settings.request_timeout)
            .map_err(|e| match e {
                CacheError::ConnectionError(message) => ConnectError::InvalidSettings(message),
                other => ConnectError::Construction(other.to_string()),
            })?;
        Ok(Arc::new(cache))
    }
}
