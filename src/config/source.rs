//! Configuration sources consulted by the lifecycle managers.

use super::DataLayerConfig;
use parking_lot::RwLock;
use std::fmt::Debug;
use tracing::warn;

/// Supplies the current configuration
///
/// Called on every lifecycle initialization, never cached by the caller.
pub trait ConfigSource: Send + Sync + Debug {
    fn load(&self) -> DataLayerConfig;
}

/// Reads the process environment on every load
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfigSource;

impl ConfigSource for EnvConfigSource {
    fn load(&self) -> DataLayerConfig {
        match DataLayerConfig::from_env() {
            Ok(config) => config,
            Err(e) => {
                // A broken environment disables the clients rather than the caller
                warn!(
                    event = "config_load_failed",
                    error = %e,
                    "Failed to load data layer configuration, treating settings as absent"
                );
                DataLayerConfig::default()
            }
        }
    }
}

/// In-memory configuration that can be swapped at runtime
///
/// Used by embedding hosts that resolve settings themselves and by tests
/// that need to change configuration between `reset()` calls without
/// touching the process environment.
#[derive(Debug, Default)]
pub struct StaticConfigSource {
    config: RwLock<DataLayerConfig>,
}

impl StaticConfigSource {
    pub fn new(config: DataLayerConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// Replace the configuration returned by subsequent loads
    pub fn set(&self, config: DataLayerConfig) {
        *self.config.write() = config;
    }

    /// Mutate the configuration in place
    pub fn update<F: FnOnce(&mut DataLayerConfig)>(&self, f: F) {
        f(&mut self.config.write());
    }
}

impl ConfigSource for StaticConfigSource {
    fn load(&self) -> DataLayerConfig {
        self.config.read().clone()
    }
}
