use crate::config::{redact_url, PoolConfig};
use crate::error::ConnectError;
use crate::runtime::RealtimeTransport;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::time::Duration;
use tracing::debug;

/// Read-oriented database client
///
/// Built for short, stateless queries with fast cold starts; connections are
/// opened on first use.
#[derive(Debug, Clone)]
pub struct QueryClient {
    pool: PgPool,
}

impl QueryClient {
    pub fn new(url: &str, pool_config: &PoolConfig) -> Result<Self, ConnectError> {
        ensure_async_runtime()?;

        let pool = PgPoolOptions::new()
            .max_connections(pool_config.max_connections)
            .acquire_timeout(pool_config.acquire_timeout())
            .test_before_acquire(false)
            .connect_lazy(url)?;

        debug!(url = %redact_url(url), "Query pool created");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 as health")
            .fetch_one(&self.pool)
            .await?;

        let health: i32 = row.get("health");
        Ok(health == 1)
    }
}

/// Transaction-capable database client
///
/// When built for a single request (restricted runtimes) the pool holds at
/// most one connection and keeps nothing idle, so the handle can be dropped
/// with the request.
#[derive(Debug, Clone)]
pub struct TransactionalClient {
    pool: PgPool,
    transport: Option<RealtimeTransport>,
    per_request: bool,
}

impl TransactionalClient {
    pub fn new(
        url: &str,
        pool_config: &PoolConfig,
        transport: Option<&RealtimeTransport>,
        per_request: bool,
    ) -> Result<Self, ConnectError> {
        ensure_async_runtime()?;

        let options = if per_request {
            PgPoolOptions::new()
                .max_connections(1)
                .min_connections(0)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            PgPoolOptions::new()
                .max_connections(pool_config.max_connections)
                .idle_timeout(Some(Duration::from_secs(60)))
        };

        let pool = options
            .acquire_timeout(pool_config.acquire_timeout())
            .connect_lazy(url)?;

        debug!(
            url = %redact_url(url),
            transport = transport.map(RealtimeTransport::name),
            per_request = per_request,
            "Transactional pool created"
        );

        Ok(Self {
            pool,
            transport: transport.cloned(),
            per_request,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction on a pooled connection
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    pub fn transport(&self) -> Option<&RealtimeTransport> {
        self.transport.as_ref()
    }

    pub fn is_per_request(&self) -> bool {
        self.per_request
    }
}

/// sqlx spawns pool maintenance onto the ambient tokio runtime; without one
/// the pool constructor would panic instead of failing.
fn ensure_async_runtime() -> Result<(), ConnectError> {
    tokio::runtime::Handle::try_current()
        .map(|_| ())
        .map_err(|e| ConnectError::Construction(format!("No async runtime available: {e}")))
}
