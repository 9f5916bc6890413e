//! Outbound request notifications.

use std::sync::Arc;

/// An HTTP request about to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: String,
    pub url: String,
}

/// Callback invoked for every outbound request.
pub type RequestListener = Arc<dyn Fn(&OutboundRequest) + Send + Sync>;

/// A transport that can report the requests it sends.
pub trait RequestEvents: Send + Sync {
    /// Register a listener for the lifetime of the transport.
    fn on_sending_request(&self, listener: RequestListener);
}
