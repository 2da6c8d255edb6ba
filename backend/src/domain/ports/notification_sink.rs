//! Fire-and-forget submission of notification work.
//!
//! Services hand dispatch requests to a sink and return immediately. The sink
//! is synchronous on purpose: nothing on the request path awaits delivery.

use crate::domain::DispatchRequest;

use super::define_port_error;

define_port_error! {
    /// Errors raised when a request cannot be queued.
    pub enum NotificationSinkError {
        /// The background worker is no longer accepting work.
        Closed => "notification worker has stopped",
    }
}

/// Queue a dispatch request without waiting for it.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSink: Send + Sync {
    /// Submit `request` for background dispatch.
    fn submit(&self, request: DispatchRequest) -> Result<(), NotificationSinkError>;
}

/// Sink that drops every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationSink;

impl NotificationSink for FixtureNotificationSink {
    fn submit(&self, _request: DispatchRequest) -> Result<(), NotificationSinkError> {
        Ok(())
    }
}

/// Submit `request` and log, rather than propagate, a refusal.
pub fn submit_detached(sink: &dyn NotificationSink, request: DispatchRequest) {
    let kind = request.event.kind();
    let pair_id = request.pair_id;
    if let Err(error) = sink.submit(request) {
        tracing::warn!(%error, %kind, %pair_id, "dropping notification");
    }
}
