//! # Key-Value Cache
//!
//! Best-effort caching for score payloads, search results and theme
//! summaries.
//!
//! ## Architecture
//!
//! ```text
//! KvStore (façade: keys, encoding, TTL policy, error swallowing)
//!   └── LifecycleManager<CacheConnector> (one shared client, lazily built)
//!         └── dyn CacheService
//!               └── UpstashRestCache (Redis REST over HTTPS)
//! ```
//!
//! ## Policy
//!
//! - Score TTLs follow the title's release age ([`ttl::compute_ttl`]); no
//!   usable release metadata means the score is not cached at all
//! - Score entries carry a schema version tag ([`entry::KV_SCHEMA_VERSION`]);
//!   entries from another version read as misses and expire on their own
//! - Search results and theme summaries use fixed TTLs
//!
//! ## Graceful Degradation
//!
//! Missing credentials or a failed client construction disable the cache for
//! the process; reads miss and writes no-op. Backend failures on an active
//! client affect only the call that hit them.

pub mod connector;
pub mod entry;
pub mod errors;
pub mod keys;
pub mod providers;
pub mod store;
pub mod traits;
pub mod ttl;

pub use connector::{CacheConnector, CacheSettings};
pub use entry::{CacheRead, KV_SCHEMA_VERSION};
pub use errors::{CacheError, CacheResult};
pub use providers::UpstashRestCache;
pub use store::{CacheHealth, KvStore};
pub use traits::CacheService;
pub use ttl::{compute_ttl, ReleaseInfo};
