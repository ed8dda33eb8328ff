//! Connector trait: how a lifecycle manager builds one kind of client.

use super::state::{ClientKind, Reuse};
use crate::config::DataLayerConfig;
use crate::error::ConnectError;
use crate::runtime::RealtimeTransport;
use std::sync::Arc;

/// What the manager knows about the call a handle is being built for
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectContext<'a> {
    /// Realtime transport offered by the runtime, if any
    pub transport: Option<&'a RealtimeTransport>,
    /// Handle serves a single request and will not be memoized
    pub per_request: bool,
}

/// Builds client handles for one backing service
///
/// A connector owns no state of its own. The lifecycle manager decides when
/// to call it and what to do with the outcome.
pub trait Connector: Send + Sync {
    type Client: ?Sized + Send + Sync;
    type Settings: Send;

    fn kind(&self) -> ClientKind;

    fn reuse(&self) -> Reuse {
        Reuse::Process
    }

    /// Whether a restricted runtime must provide a realtime transport before
    /// construction is attempted
    fn requires_transport_when_restricted(&self) -> bool {
        false
    }

    /// Extract the settings this client needs, `None` when not configured
    fn settings(&self, config: &DataLayerConfig) -> Option<Self::Settings>;

    /// Construct a handle
    ///
    /// Must not perform network round trips: construction acquires a handle,
    /// the first operation on it connects.
    fn connect(
        &self,
        settings: Self::Settings,
        context: ConnectContext<'_>,
    ) -> Result<Arc<Self::Client>, ConnectError>;
}
