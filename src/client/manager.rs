//! Lazy, memoizing owner of one client handle.

use super::connector::{ConnectContext, Connector};
use super::state::{ClientKind, ClientState, Reuse};
use crate::config::ConfigSource;
use crate::error::ConnectError;
use crate::runtime::{RuntimeProbe, RuntimeSignals};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owns the lifecycle of one client: lazy construction, memoization,
/// degradation to disabled, and reset.
///
/// Concurrent first calls may each construct a handle; whichever result
/// reaches the slot first is kept and returned to every caller, the others
/// are dropped. Construction has no side effects beyond acquiring a handle,
/// so the duplicate work is harmless.
pub struct LifecycleManager<C: Connector> {
    connector: C,
    config: Arc<dyn ConfigSource>,
    runtime: Arc<dyn RuntimeProbe>,
    state: RwLock<ClientState<C::Client>>,
    /// Set after the first per-request failure under a restricted runtime
    restricted_unavailable: AtomicBool,
}

impl<C: Connector> std::fmt::Debug for LifecycleManager<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleManager")
            .field("kind", &self.connector.kind())
            .field("reuse", &self.connector.reuse())
            .field("state", &*self.state.read())
            .field(
                "restricted_unavailable",
                &self.restricted_unavailable.load(Ordering::Acquire),
            )
            .finish()
    }
}

impl<C: Connector> LifecycleManager<C> {
    pub fn new(connector: C, config: Arc<dyn ConfigSource>, runtime: Arc<dyn RuntimeProbe>) -> Self {
        Self {
            connector,
            config,
            runtime,
            state: RwLock::new(ClientState::Uninitialized),
            restricted_unavailable: AtomicBool::new(false),
        }
    }

    pub fn kind(&self) -> ClientKind {
        self.connector.kind()
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Snapshot of the memoized state
    pub fn state(&self) -> ClientState<C::Client> {
        self.state.read().clone()
    }

    /// Whether the restricted-runtime latch is set
    pub fn is_restricted_unavailable(&self) -> bool {
        self.restricted_unavailable.load(Ordering::Acquire)
    }

    /// Get the client, constructing it on first demand
    ///
    /// Returns `None` when the client is disabled. Never errors and never
    /// retries a failed construction on its own; only [`reset`](Self::reset)
    /// clears a disabled state.
    pub fn get(&self) -> Option<Arc<C::Client>> {
        let signals = self.runtime.signals();

        if self.connector.reuse() == Reuse::PerRequestWhenRestricted && signals.is_restricted() {
            return self.connect_per_request(&signals);
        }

        {
            let state = self.state.read();
            if state.is_resolved() {
                return state.handle();
            }
        }

        let outcome = self.initialize(&signals);

        let mut state = self.state.write();
        if !state.is_resolved() {
            *state = outcome;
        }
        state.handle()
    }

    /// Forget the memoized state and the restricted-runtime latch
    ///
    /// The next `get()` re-reads configuration from scratch. Meant for test
    /// isolation and environment reconfiguration, not for request handling.
    pub fn reset(&self) {
        *self.state.write() = ClientState::Uninitialized;
        self.restricted_unavailable.store(false, Ordering::Release);
        debug!(client = %self.kind(), "Client lifecycle reset");
    }

    fn initialize(&self, signals: &RuntimeSignals) -> ClientState<C::Client> {
        let kind = self.kind();
        let config = self.config.load();

        let Some(settings) = self.connector.settings(&config) else {
            info!(
                event = kind.disabled_event(),
                client = %kind,
                reason = kind.missing_config_reason(),
                "Client disabled: missing configuration"
            );
            return ClientState::Disabled;
        };

        let context = ConnectContext {
            transport: signals.realtime_transport.as_ref(),
            per_request: false,
        };

        match self.connector.connect(settings, context) {
            Ok(handle) => {
                info!(event = kind.enabled_event(), client = %kind, "Client enabled");
                ClientState::Active(handle)
            }
            Err(e) => {
                warn!(
                    event = kind.init_failed_event(),
                    client = %kind,
                    error = %e,
                    "Client initialization failed, disabling"
                );
                ClientState::Disabled
            }
        }
    }

    /// Restricted runtimes build a fresh handle per call and never read the
    /// memoized slot.
    fn connect_per_request(&self, signals: &RuntimeSignals) -> Option<Arc<C::Client>> {
        let kind = self.kind();

        if self.restricted_unavailable.load(Ordering::Acquire) {
            return None;
        }

        let config = self.config.load();
        let Some(settings) = self.connector.settings(&config) else {
            info!(
                event = kind.disabled_event(),
                client = %kind,
                reason = kind.missing_config_reason(),
                "Client disabled: missing configuration"
            );
            return None;
        };

        let transport = signals.realtime_transport.as_ref();
        if self.connector.requires_transport_when_restricted() && transport.is_none() {
            self.restricted_unavailable.store(true, Ordering::Release);
            let error = ConnectError::TransportUnavailable(
                "restricted runtime provides no realtime transport".to_string(),
            );
            warn!(
                event = kind.unavailable_event(),
                client = %kind,
                error = %error,
                "Client unavailable in restricted runtime"
            );
            return None;
        }

        let context = ConnectContext {
            transport,
            per_request: true,
        };

        match self.connector.connect(settings, context) {
            Ok(handle) => {
                debug!(client = %kind, "Per-request client constructed");
                Some(handle)
            }
            Err(e) => {
                self.restricted_unavailable.store(true, Ordering::Release);
                warn!(
                    event = kind.init_failed_event(),
                    client = %kind,
                    error = %e,
                    "Client initialization failed in restricted runtime"
                );
                None
            }
        }
    }
}
