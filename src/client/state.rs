//! Tri-state client handle and the labels each client kind logs under.

use std::sync::Arc;

/// Memoized state of one client
///
/// `Disabled` is terminal for the process lifetime (until an explicit reset):
/// configuration was missing or construction failed, and the manager will not
/// try again on its own.
pub enum ClientState<T: ?Sized> {
    Uninitialized,
    Disabled,
    Active(Arc<T>),
}

impl<T: ?Sized> ClientState<T> {
    /// True once an initialization attempt has settled
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Uninitialized)
    }

    pub fn handle(&self) -> Option<Arc<T>> {
        match self {
            Self::Active(handle) => Some(Arc::clone(handle)),
            Self::Uninitialized | Self::Disabled => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Disabled => "disabled",
            Self::Active(_) => "active",
        }
    }
}

impl<T: ?Sized> Default for ClientState<T> {
    fn default() -> Self {
        Self::Uninitialized
    }
}

impl<T: ?Sized> Clone for ClientState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Uninitialized => Self::Uninitialized,
            Self::Disabled => Self::Disabled,
            Self::Active(handle) => Self::Active(Arc::clone(handle)),
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for ClientState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which backing-service client a manager owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientKind {
    /// Read-oriented database client
    Query,
    /// Transaction-capable database client
    Transactional,
    /// Key-value cache client
    Cache,
}

impl ClientKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "db_http",
            Self::Transactional => "db_ws",
            Self::Cache => "kv",
        }
    }

    pub(crate) fn disabled_event(&self) -> &'static str {
        match self {
            Self::Query | Self::Transactional => "db_disabled",
            Self::Cache => "kv_disabled",
        }
    }

    pub(crate) fn enabled_event(&self) -> &'static str {
        match self {
            Self::Query => "db_http_enabled",
            Self::Transactional => "db_ws_enabled",
            Self::Cache => "kv_enabled",
        }
    }

    pub(crate) fn init_failed_event(&self) -> &'static str {
        match self {
            Self::Query => "db_http_init_failed",
            Self::Transactional => "db_ws_init_failed",
            Self::Cache => "kv_init_failed",
        }
    }

    pub(crate) fn unavailable_event(&self) -> &'static str {
        match self {
            Self::Query => "db_http_unavailable",
            Self::Transactional => "db_ws_unavailable",
            Self::Cache => "kv_unavailable",
        }
    }

    pub(crate) fn missing_config_reason(&self) -> &'static str {
        match self {
            Self::Query | Self::Transactional => "Missing POSTGRES_URL env var",
            Self::Cache => "Missing Redis env vars",
        }
    }
}

impl std::fmt::Display for ClientKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a client may be memoized across requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reuse {
    /// One handle per process
    Process,
    /// One handle per process, except under a restricted runtime where a
    /// fresh handle is built for every call
    PerRequestWhenRestricted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_resolution() {
        let uninit: ClientState<str> = ClientState::Uninitialized;
        let disabled: ClientState<str> = ClientState::Disabled;
        let active: ClientState<str> = ClientState::Active(Arc::from("handle"));

        assert!(!uninit.is_resolved());
        assert!(disabled.is_resolved());
        assert!(active.is_resolved());

        assert!(uninit.handle().is_none());
        assert!(disabled.handle().is_none());
        assert_eq!(active.handle().as_deref(), Some("handle"));
    }

    #[test]
    fn test_clone_shares_handle() {
        let active: ClientState<str> = ClientState::Active(Arc::from("handle"));
        let copy = active.clone();
        assert!(Arc::ptr_eq(&active.handle().unwrap(), &copy.handle().unwrap()));
    }

    #[test]
    fn test_event_names() {
        assert_eq!(ClientKind::Query.enabled_event(), "db_http_enabled");
        assert_eq!(ClientKind::Transactional.init_failed_event(), "db_ws_init_failed");
        assert_eq!(ClientKind::Transactional.unavailable_event(), "db_ws_unavailable");
        assert_eq!(ClientKind::Cache.disabled_event(), "kv_disabled");
        assert_eq!(ClientKind::Query.disabled_event(), "db_disabled");
    }
}
