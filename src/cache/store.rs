//! Best-effort cache façade over the shared cache client.
//!
//! Every namespace (scores, search results, theme summaries) goes through the
//! one [`LifecycleManager`] held here, so enabling and disabling the cache is
//! a process-wide fact. No method returns an error: a disabled client, a
//! failed backend call, an undecodable value, and a version mismatch all read
//! as a miss, and failed writes are dropped after a warning.

use super::connector::CacheConnector;
use super::entry::{decode_versioned, encode_versioned, CacheRead, KV_SCHEMA_VERSION};
use super::errors::CacheResult;
use super::keys::{score_key, search_key, theme_key};
use super::traits::CacheService;
use super::ttl::{ReleaseInfo, SEARCH_TTL_SECONDS, THEME_TTL_SECONDS};
use crate::client::{Connector, LifecycleManager};
use crate::config::ConfigSource;
use crate::runtime::RuntimeProbe;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Health of the cache backend as seen by the façade
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheHealth {
    /// Not configured, or construction failed
    Disabled,
    Healthy,
    Unhealthy(String),
}

/// Cache façade
pub struct KvStore<C = CacheConnector>
where
    C: Connector<Client = dyn CacheService>,
{
    manager: Arc<LifecycleManager<C>>,
    schema_version: u32,
}

impl KvStore<CacheConnector> {
    /// Façade over the Redis REST backend
    pub fn new(config: Arc<dyn ConfigSource>, runtime: Arc<dyn RuntimeProbe>) -> Self {
        Self::with_manager(Arc::new(LifecycleManager::new(
            CacheConnector,
            config,
            runtime,
        )))
    }
}

impl<C> KvStore<C>
where
    C: Connector<Client = dyn CacheService>,
{
    pub fn with_manager(manager: Arc<LifecycleManager<C>>) -> Self {
        Self {
            manager,
            schema_version: KV_SCHEMA_VERSION,
        }
    }

    /// Same client, different expected payload version
    ///
    /// Models a deploy that changes the score payload shape: entries written
    /// under the previous version read as misses.
    pub fn with_schema_version(&self, schema_version: u32) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
            schema_version,
        }
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn manager(&self) -> &LifecycleManager<C> {
        &self.manager
    }

    /// Forget the cache client (test isolation and reconfiguration only)
    pub fn reset(&self) {
        self.manager.reset();
    }

    // Scores

    pub async fn get_score<T: DeserializeOwned>(&self, id: &str) -> Option<T> {
        let client = self.manager.get()?;

        match self.read_score(client.as_ref(), id).await {
            Ok(Some(payload)) => {
                info!(event = "kv_hit", id = id, "Score cache hit");
                Some(payload)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(event = "kv_get_failed", id = id, error = %e, "Score cache read failed");
                None
            }
        }
    }

    /// Cache a score payload for as long as its release age allows
    pub async fn set_score<T: Serialize + Sync>(&self, id: &str, payload: &T, release: &ReleaseInfo) {
        self.set_score_at(id, payload, release, Utc::now()).await;
    }

    /// [`set_score`](Self::set_score) with an explicit clock
    pub async fn set_score_at<T: Serialize + Sync>(
        &self,
        id: &str,
        payload: &T,
        release: &ReleaseInfo,
        now: DateTime<Utc>,
    ) {
        let Some(ttl_seconds) = release.ttl_at(now) else {
            debug!(id = id, "No usable release metadata, score not cached");
            return;
        };
        let Some(client) = self.manager.get() else {
            return;
        };

        let outcome = match encode_versioned(payload, self.schema_version) {
            Ok(value) => {
                client
                    .set(&score_key(id), &value, Duration::from_secs(ttl_seconds))
                    .await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => info!(event = "kv_set", id = id, ttl_seconds = ttl_seconds, "Score cached"),
            Err(e) => warn!(event = "kv_set_failed", id = id, error = %e, "Score cache write failed"),
        }
    }

    async fn read_score<T: DeserializeOwned>(
        &self,
        client: &dyn CacheService,
        id: &str,
    ) -> CacheResult<Option<T>> {
        let Some(raw) = client.get(&score_key(id)).await? else {
            return Ok(None);
        };

        match decode_versioned(&raw, self.schema_version)? {
            CacheRead::Hit(payload) => Ok(Some(payload)),
            CacheRead::Stale { found } => {
                debug!(
                    id = id,
                    found = ?found,
                    expected = self.schema_version,
                    "Cached score has another schema version, ignoring"
                );
                Ok(None)
            }
        }
    }

    // Search results

    /// An empty stored list is a hit: the search ran and found nothing
    pub async fn get_search<T: DeserializeOwned>(
        &self,
        query: &str,
        year: Option<i32>,
    ) -> Option<Vec<T>> {
        let client = self.manager.get()?;

        let outcome = match client.get(&search_key(query, year)).await {
            Ok(Some(raw)) => serde_json::from_str::<Vec<T>>(&raw).map(Some).map_err(Into::into),
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(Some(results)) => {
                info!(event = "kv_search_hit", query = query, "Search cache hit");
                Some(results)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(
                    event = "kv_search_get_failed",
                    query = query,
                    error = %e,
                    "Search cache read failed"
                );
                None
            }
        }
    }

    pub async fn set_search<T: Serialize + Sync>(&self, query: &str, year: Option<i32>, results: &[T]) {
        let Some(client) = self.manager.get() else {
            return;
        };

        let outcome = match serde_json::to_string(results) {
            Ok(value) => {
                client
                    .set(
                        &search_key(query, year),
                        &value,
                        Duration::from_secs(SEARCH_TTL_SECONDS),
                    )
                    .await
            }
            Err(e) => Err(e.into()),
        };

        match outcome {
            Ok(()) => info!(
                event = "kv_search_set",
                query = query,
                count = results.len(),
                "Search results cached"
            ),
            Err(e) => warn!(
                event = "kv_search_set_failed",
                query = query,
                error = %e,
                "Search cache write failed"
            ),
        }
    }

    // Theme summaries

    /// An empty stored summary is a miss
    pub async fn get_theme(&self, id: &str, theme_id: &str) -> Option<String> {
        let client = self.manager.get()?;

        match client.get(&theme_key(id, theme_id)).await {
            Ok(Some(raw)) => {
                let summary = decode_text(raw);
                if summary.is_empty() {
                    return None;
                }
                info!(event = "kv_theme_hit", id = id, theme_id = theme_id, "Theme cache hit");
                Some(summary)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(
                    event = "kv_theme_get_failed",
                    id = id,
                    theme_id = theme_id,
                    error = %e,
                    "Theme cache read failed"
                );
                None
            }
        }
    }

    pub async fn set_theme(&self, id: &str, theme_id: &str, summary: &str) {
        let Some(client) = self.manager.get() else {
            return;
        };

        let outcome = match serde_json::to_string(summary) {
            Ok(value) => {
                client
                    .set(
                        &theme_key(id, theme_id),
                        &value,
                        Duration::from_secs(THEME_TTL_SECONDS),
                    )
                    .await
            }
            Err(e) => Err(e.into()),
        };

        match outcome {
            Ok(()) => info!(event = "kv_theme_set", id = id, theme_id = theme_id, "Theme summary cached"),
            Err(e) => warn!(
                event = "kv_theme_set_failed",
                id = id,
                theme_id = theme_id,
                error = %e,
                "Theme cache write failed"
            ),
        }
    }

    /// Ping the backend; never errors
    pub async fn health(&self) -> CacheHealth {
        let Some(client) = self.manager.get() else {
            return CacheHealth::Disabled;
        };

        match client.health_check().await {
            Ok(true) => CacheHealth::Healthy,
            Ok(false) => CacheHealth::Unhealthy("Unexpected PING reply".to_string()),
            Err(e) => CacheHealth::Unhealthy(e.to_string()),
        }
    }
}

impl<C> Clone for KvStore<C>
where
    C: Connector<Client = dyn CacheService>,
{
    fn clone(&self) -> Self {
        self.with_schema_version(self.schema_version)
    }
}

impl<C> std::fmt::Debug for KvStore<C>
where
    C: Connector<Client = dyn CacheService>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore")
            .field("manager", &self.manager)
            .field("schema_version", &self.schema_version)
            .finish()
    }
}

/// Summaries are stored JSON-encoded; values written raw by other tools are
/// taken as-is.
fn decode_text(raw: String) -> String {
    serde_json::from_str::<String>(&raw).unwrap_or(raw)
}
