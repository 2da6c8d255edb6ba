//! Port for delivering a message to one push endpoint.

use async_trait::async_trait;

use crate::domain::{PushMessage, PushSubscription};

use super::define_port_error;

define_port_error! {
    /// Delivery failures reported by push transports.
    pub enum PushDeliveryError {
        /// The push service says the endpoint no longer exists.
        Gone { status: u16 } => "push endpoint gone (status {status})",
        /// The push service refused the message.
        Rejected { status: u16 } => "push service rejected message (status {status})",
        /// The push service could not be reached.
        Transport { message: String } => "push transport failed: {message}",
        /// The stored descriptor could not be used to build a message.
        InvalidSubscription { message: String } => "push subscription unusable: {message}",
        /// Push delivery is not configured.
        Disabled => "push delivery is disabled",
    }
}

impl PushDeliveryError {
    /// Whether the subscription should be removed.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Gone { .. })
    }
}

/// Deliver one encrypted push message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Send `message` to `subscription`.
    async fn send(
        &self,
        subscription: &PushSubscription,
        message: &PushMessage,
    ) -> Result<(), PushDeliveryError>;
}

/// Transport used when no VAPID key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPushTransport;

#[async_trait]
impl PushTransport for DisabledPushTransport {
    async fn send(
        &self,
        subscription: &PushSubscription,
        _message: &PushMessage,
    ) -> Result<(), PushDeliveryError> {
        tracing::debug!(
            subscription_id = %subscription.id,
            "push delivery disabled; skipping send"
        );
        Err(PushDeliveryError::disabled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PushDeliveryError::gone(410_u16), true)]
    #[case(PushDeliveryError::gone(404_u16), true)]
    #[case(PushDeliveryError::rejected(429_u16), false)]
    #[case(PushDeliveryError::transport("timed out"), false)]
    #[case(PushDeliveryError::invalid_subscription("bad key"), false)]
    #[case(PushDeliveryError::disabled(), false)]
    fn only_gone_is_terminal(#[case] error: PushDeliveryError, #[case] terminal: bool) {
        assert_eq!(error.is_terminal(), terminal);
    }
}
