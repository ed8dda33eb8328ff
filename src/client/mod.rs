//! # Client Lifecycle
//!
//! Lazy construction, memoization, degradation, and reset of backing-service
//! clients. One [`LifecycleManager`] exists per client kind:
//!
//! ```text
//! LifecycleManager<QueryConnector>          <- read-oriented database client
//! LifecycleManager<TransactionalConnector>  <- transaction-capable database client
//! LifecycleManager<CacheConnector>          <- key-value cache client (shared by all namespaces)
//! ```
//!
//! Each manager holds its own `Uninitialized | Disabled | Active` state; the
//! two database managers never share state even though they point at the
//! same database.
//!
//! ## Degradation
//!
//! - Missing configuration: info-level event, `Disabled`, no construction attempt
//! - Construction failure: warn-level event, `Disabled`, no automatic retry
//! - Restricted runtime, non-reusable client: fresh handle per call; the first
//!   failure (or a missing realtime transport) latches the client unavailable
//!   until `reset()`

pub mod connector;
pub mod manager;
pub mod state;

pub use connector::{ConnectContext, Connector};
pub use manager::LifecycleManager;
pub use state::{ClientKind, ClientState, Reuse};
