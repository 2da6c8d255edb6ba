//! Port for push subscription storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{PushSubscription, SubscriptionDescriptor, SubscriptionId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by subscription repository adapters.
    pub enum SubscriptionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "subscription repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "subscription repository query failed: {message}",
    }
}

/// Push subscription persistence, keyed by `(user, endpoint)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Every registration for `user_id`.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PushSubscription>, SubscriptionRepositoryError>;

    /// Insert a registration, or refresh the stored descriptor when the user
    /// already registered this endpoint.
    async fn upsert(
        &self,
        user_id: &UserId,
        descriptor: &SubscriptionDescriptor,
        at: DateTime<Utc>,
    ) -> Result<PushSubscription, SubscriptionRepositoryError>;

    /// Remove a registration by id. Returns whether a row was removed.
    async fn delete(&self, id: &SubscriptionId) -> Result<bool, SubscriptionRepositoryError>;

    /// Remove the user's registrations for `endpoint`. Returns the count.
    async fn delete_by_endpoint(
        &self,
        user_id: &UserId,
        endpoint: &str,
    ) -> Result<u64, SubscriptionRepositoryError>;
}
