//! Driving port for push endpoint registration.

use async_trait::async_trait;

use crate::domain::{Error, PushSubscription, SubscriptionDescriptor, UserId};

/// Register and remove push endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushRegistry: Send + Sync {
    /// Register or refresh an endpoint for the user.
    async fn subscribe(
        &self,
        user_id: UserId,
        descriptor: SubscriptionDescriptor,
    ) -> Result<PushSubscription, Error>;

    /// Remove the user's registrations for `endpoint`, returning how many went.
    async fn unsubscribe(&self, user_id: UserId, endpoint: String) -> Result<u64, Error>;
}
