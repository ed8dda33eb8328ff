use crate::cache::KvStore;
use crate::config::{ConfigSource, EnvConfigSource};
use crate::database::DatabaseClients;
use crate::runtime::{ProcessRuntime, RuntimeProbe};
use std::sync::Arc;
use tracing::{debug, info};

/// Shared data-layer dependencies
///
/// Owns every client lifecycle the process uses:
/// - Read-oriented database client
/// - Transaction-capable database client
/// - Cache client, shared by every cache namespace
///
/// All three read the same configuration source and runtime probe. Nothing
/// connects at construction; each client is built on first use.
pub struct DataContext {
    config: Arc<dyn ConfigSource>,
    runtime: Arc<dyn RuntimeProbe>,
    database: DatabaseClients,
    kv: KvStore,
}

impl std::fmt::Debug for DataContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataContext")
            .field("config", &self.config)
            .field("runtime", &self.runtime)
            .field("database", &self.database)
            .field("kv", &self.kv)
            .finish()
    }
}

impl DataContext {
    /// Context reading the process environment and runtime markers
    pub fn from_env() -> Self {
        Self::new(Arc::new(EnvConfigSource), Arc::new(ProcessRuntime))
    }

    /// Context over an explicit configuration source and runtime probe
    pub fn new(config: Arc<dyn ConfigSource>, runtime: Arc<dyn RuntimeProbe>) -> Self {
        info!(restricted = runtime.is_restricted(), "Initializing data context");

        Self {
            database: DatabaseClients::new(Arc::clone(&config), Arc::clone(&runtime)),
            kv: KvStore::new(Arc::clone(&config), Arc::clone(&runtime)),
            config,
            runtime,
        }
    }

    pub fn database(&self) -> &DatabaseClients {
        &self.database
    }

    pub fn kv(&self) -> &KvStore {
        &self.kv
    }

    pub fn config(&self) -> &Arc<dyn ConfigSource> {
        &self.config
    }

    pub fn runtime(&self) -> &Arc<dyn RuntimeProbe> {
        &self.runtime
    }

    /// Reset every client lifecycle
    ///
    /// For test isolation and environment reconfiguration; never call it
    /// while serving requests.
    pub fn reset(&self) {
        self.database.reset();
        self.kv.reset();
        debug!("Data context reset");
    }
}
