#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Cinescore Data
//!
//! Resilient data access for Cinescore: lazily built database and cache
//! clients that degrade instead of failing, plus the content-aware cache
//! policy that decides how long a score may live and whether a stored one is
//! still valid.
//!
//! ## Overview
//!
//! Callers ask for a client and get `Some(handle)` or `None`. Missing
//! configuration, a failed construction, or a restricted (edge) runtime
//! without the transport a client needs all resolve to `None`, and the
//! caller falls back to computing fresh data. The cache façade goes further:
//! it never returns an error, and every failure reads as a miss.
//!
//! ## Module Organization
//!
//! - [`runtime`] - Restricted-runtime detection
//! - [`client`] - Lazy, memoizing client lifecycle shared by every backend
//! - [`database`] - Read and transactional Postgres clients
//! - [`cache`] - TTL policy, versioned entries, Redis REST backend, cache façade
//! - [`schema`] - Score version constant and `movies` index definitions
//! - [`version_guard`] - Check that indexes and migrations follow the score version
//! - [`data_context`] - Composition root owning all three client lifecycles
//! - [`config`] - Environment-driven settings
//! - [`logging`] - Structured logging bootstrap
//! - [`error`] - Error types
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cinescore_data::{DataContext, ReleaseInfo};
//! use serde_json::json;
//!
//! # async fn example() {
//! cinescore_data::logging::init_structured_logging();
//! let context = DataContext::from_env();
//!
//! let cached: Option<serde_json::Value> = context.kv().get_score("tt0113277").await;
//! if cached.is_none() {
//!     let fresh = json!({ "title": "Heat", "overall": 87.5 });
//!     let release = ReleaseInfo::new(Some("1995-12-15"), Some("1995"));
//!     context.kv().set_score("tt0113277", &fresh, &release).await;
//! }
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod data_context;
pub mod database;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod schema;
pub mod version_guard;

pub use cache::{compute_ttl, CacheHealth, KvStore, ReleaseInfo, KV_SCHEMA_VERSION};
pub use client::{ClientKind, ClientState, LifecycleManager};
pub use config::{ConfigSource, DataLayerConfig, EnvConfigSource, StaticConfigSource};
pub use data_context::DataContext;
pub use database::{DatabaseClients, QueryClient, TransactionalClient};
pub use error::{ConnectError, DataLayerError, Result};
pub use runtime::{is_restricted_runtime, ProcessRuntime, RuntimeProbe, RuntimeSignals, StaticRuntime};
pub use schema::CURRENT_SCORE_VERSION;
