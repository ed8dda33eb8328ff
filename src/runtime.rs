//! # Runtime Detection
//!
//! Decides whether the current execution context is a restricted ("edge")
//! runtime that forbids long-lived connections and isolates each request.
//!
//! Three independent signals are consulted, in order:
//!
//! 1. an environment-identifying marker (`EDGE_RUNTIME`)
//! 2. the runtime-internal socket pairing primitive (`WEBSOCKET_PAIR`)
//! 3. the platform user agent, compared against [`RESTRICTED_USER_AGENT`]
//!
//! Any one of them marks the runtime as restricted. Detection is re-evaluated
//! on every call; hosts may toggle it and tests substitute a [`StaticRuntime`].

use parking_lot::RwLock;
use std::fmt::Debug;

/// User agent reported by the restricted worker platform
pub const RESTRICTED_USER_AGENT: &str = "Cloudflare-Workers";

pub const EDGE_RUNTIME_VAR: &str = "EDGE_RUNTIME";
pub const WEBSOCKET_PAIR_VAR: &str = "WEBSOCKET_PAIR";
pub const USER_AGENT_VAR: &str = "RUNTIME_USER_AGENT";
pub const REALTIME_TRANSPORT_VAR: &str = "REALTIME_TRANSPORT";

/// Realtime (websocket-style) transport provided by the host runtime
///
/// The transactional database client needs one when it is built inside a
/// restricted runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealtimeTransport {
    name: String,
}

impl RealtimeTransport {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }

    pub fn websocket() -> Self {
        Self::new("websocket")
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Snapshot of the ambient runtime signals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeSignals {
    pub edge_marker: Option<String>,
    pub socket_pair: bool,
    pub user_agent: Option<String>,
    pub realtime_transport: Option<RealtimeTransport>,
}

impl RuntimeSignals {
    /// A long-lived process with a websocket transport available
    pub fn standard() -> Self {
        Self {
            realtime_transport: Some(RealtimeTransport::websocket()),
            ..Self::default()
        }
    }

    /// An edge runtime identified by its marker, with a websocket transport
    pub fn edge() -> Self {
        Self {
            edge_marker: Some("edge-runtime".to_string()),
            realtime_transport: Some(RealtimeTransport::websocket()),
            ..Self::default()
        }
    }

    pub fn without_transport(mut self) -> Self {
        self.realtime_transport = None;
        self
    }

    pub fn is_restricted(&self) -> bool {
        self.edge_marker.is_some()
            || self.socket_pair
            || self.user_agent.as_deref() == Some(RESTRICTED_USER_AGENT)
    }
}

/// Source of runtime signals
pub trait RuntimeProbe: Send + Sync + Debug {
    fn signals(&self) -> RuntimeSignals;

    fn is_restricted(&self) -> bool {
        self.signals().is_restricted()
    }
}

/// Reads runtime signals from the process environment on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRuntime;

impl RuntimeProbe for ProcessRuntime {
    fn signals(&self) -> RuntimeSignals {
        RuntimeSignals {
            edge_marker: env_value(EDGE_RUNTIME_VAR),
            socket_pair: std::env::var_os(WEBSOCKET_PAIR_VAR).is_some(),
            user_agent: env_value(USER_AGENT_VAR),
            realtime_transport: env_value(REALTIME_TRANSPORT_VAR).map(RealtimeTransport::new),
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Fixed, swappable runtime signals
#[derive(Debug, Default)]
pub struct StaticRuntime {
    signals: RwLock<RuntimeSignals>,
}

impl StaticRuntime {
    pub fn new(signals: RuntimeSignals) -> Self {
        Self {
            signals: RwLock::new(signals),
        }
    }

    pub fn standard() -> Self {
        Self::new(RuntimeSignals::standard())
    }

    pub fn edge() -> Self {
        Self::new(RuntimeSignals::edge())
    }

    pub fn set(&self, signals: RuntimeSignals) {
        *self.signals.write() = signals;
    }
}

impl RuntimeProbe for StaticRuntime {
    fn signals(&self) -> RuntimeSignals {
        self.signals.read().clone()
    }
}

/// Whether the current process runs inside a restricted runtime
pub fn is_restricted_runtime() -> bool {
    ProcessRuntime.is_restricted()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_runtime_is_not_restricted() {
        assert!(!RuntimeSignals::default().is_restricted());
        assert!(!RuntimeSignals::standard().is_restricted());
    }

    #[test]
    fn test_each_signal_alone_marks_restricted() {
        let marker = RuntimeSignals {
            edge_marker: Some("edge-runtime".to_string()),
            ..RuntimeSignals::default()
        };
        let pair = RuntimeSignals {
            socket_pair: true,
            ..RuntimeSignals::default()
        };
        let agent = RuntimeSignals {
            user_agent: Some(RESTRICTED_USER_AGENT.to_string()),
            ..RuntimeSignals::default()
        };

        assert!(marker.is_restricted());
        assert!(pair.is_restricted());
        assert!(agent.is_restricted());
    }

    #[test]
    fn test_other_user_agents_are_not_restricted() {
        let signals = RuntimeSignals {
            user_agent: Some("Mozilla/5.0".to_string()),
            ..RuntimeSignals::default()
        };
        assert!(!signals.is_restricted());
    }

    #[test]
    fn test_static_runtime_can_be_toggled() {
        let runtime = StaticRuntime::standard();
        assert!(!runtime.is_restricted());

        runtime.set(RuntimeSignals::edge());
        assert!(runtime.is_restricted());

        runtime.set(RuntimeSignals::standard());
        assert!(!runtime.is_restricted());
    }

    #[test]
    fn test_without_transport_keeps_classification() {
        let signals = RuntimeSignals::edge().without_transport();
        assert!(signals.is_restricted());
        assert!(signals.realtime_transport.is_none());
    }

    #[test]
    fn test_process_runtime_reads_environment_per_call() {
        std::env::set_var(USER_AGENT_VAR, RESTRICTED_USER_AGENT);
        std::env::set_var(REALTIME_TRANSPORT_VAR, "websocket");
        assert!(is_restricted_runtime());
        assert_eq!(
            ProcessRuntime.signals().realtime_transport,
            Some(RealtimeTransport::websocket())
        );

        std::env::remove_var(USER_AGENT_VAR);
        std::env::remove_var(REALTIME_TRANSPORT_VAR);
        assert!(ProcessRuntime.signals().user_agent.is_none());
    }
}
