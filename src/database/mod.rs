//! # Database Clients
//!
//! Two independently memoized clients for the same Postgres database:
//!
//! - [`QueryClient`] - read-oriented, used for all reads, one per process
//! - [`TransactionalClient`] - transaction-capable, used for writes; under a
//!   restricted runtime it is built per request and requires the runtime's
//!   realtime transport
//!
//! Both read `POSTGRES_URL`. Neither performs network I/O at construction;
//! the first query opens a connection.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cinescore_data::DataContext;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let context = DataContext::from_env();
//!
//! if let Some(db) = context.database().query() {
//!     let healthy = db.health_check().await?;
//!     println!("database healthy: {healthy}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod connection;

pub use connection::{QueryClient, TransactionalClient};
pub use crate::schema::CURRENT_SCORE_VERSION;

use crate::client::{ClientKind, ConnectContext, Connector, LifecycleManager, Reuse};
use crate::config::{ConfigSource, DataLayerConfig, PoolConfig};
use crate::error::ConnectError;
use crate::runtime::RuntimeProbe;
use std::sync::Arc;

/// Connection settings shared by both database connectors
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub pool: PoolConfig,
}

fn database_settings(config: &DataLayerConfig) -> Option<DatabaseSettings> {
    config.database_url.as_ref().map(|url| DatabaseSettings {
        url: url.clone(),
        pool: config.pool.clone(),
    })
}

/// Builds [`QueryClient`] handles
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryConnector;

impl Connector for QueryConnector {
    type Client = QueryClient;
    type Settings = DatabaseSettings;

    fn kind(&self) -> ClientKind {
        ClientKind::Query
    }

    fn settings(&self, config: &DataLayerConfig) -> Option<DatabaseSettings> {
        database_settings(config)
    }

    fn connect(
        &self,
        settings: DatabaseSettings,
        _context: ConnectContext<'_>,
    ) -> Result<Arc<QueryClient>, ConnectError> {
        QueryClient::new(&settings.url, &settings.pool).map(Arc::new)
    }
}

/// Builds [`TransactionalClient`] handles
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionalConnector;

impl Connector for TransactionalConnector {
    type Client = TransactionalClient;
    type Settings = DatabaseSettings;

    fn kind(&self) -> ClientKind {
        ClientKind::Transactional
    }

    fn reuse(&self) -> Reuse {
        Reuse::PerRequestWhenRestricted
    }

    fn requires_transport_when_restricted(&self) -> bool {
        true
    }

    fn settings(&self, config: &DataLayerConfig) -> Option<DatabaseSettings> {
        database_settings(config)
    }

    fn connect(
        &self,
        settings: DatabaseSettings,
        context: ConnectContext<'_>,
    ) -> Result<Arc<TransactionalClient>, ConnectError> {
        TransactionalClient::new(
            &settings.url,
            &settings.pool,
            context.transport,
            context.per_request,
        )
        .map(Arc::new)
    }
}

/// Lifecycle managers for both database clients
#[derive(Debug)]
pub struct DatabaseClients {
    query: LifecycleManager<QueryConnector>,
    transactional: LifecycleManager<TransactionalConnector>,
}

impl DatabaseClients {
    pub fn new(config: Arc<dyn ConfigSource>, runtime: Arc<dyn RuntimeProbe>) -> Self {
        Self {
            query: LifecycleManager::new(QueryConnector, Arc::clone(&config), Arc::clone(&runtime)),
            transactional: LifecycleManager::new(TransactionalConnector, config, runtime),
        }
    }

    /// Read client, `None` when the database is disabled
    pub fn query(&self) -> Option<Arc<QueryClient>> {
        self.query.get()
    }

    /// Transaction-capable client, `None` when unavailable
    pub fn transactional(&self) -> Option<Arc<TransactionalClient>> {
        self.transactional.get()
    }

    pub fn query_manager(&self) -> &LifecycleManager<QueryConnector> {
        &self.query
    }

    pub fn transactional_manager(&self) -> &LifecycleManager<TransactionalConnector> {
        &self.transactional
    }

    /// Reset both clients (test isolation and reconfiguration only)
    pub fn reset(&self) {
        self.query.reset();
        self.transactional.reset();
    }
}
