//! Push endpoint registration.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{PushRegistry, SubscriptionRepository, SubscriptionRepositoryError};
use crate::domain::{Error, PushSubscription, SubscriptionDescriptor, UserId};

fn map_subscription_error(error: SubscriptionRepositoryError) -> Error {
    match error {
        SubscriptionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("subscription repository unavailable: {message}"))
        }
        SubscriptionRepositoryError::Query { message } => {
            Error::internal(format!("subscription repository error: {message}"))
        }
    }
}

/// Registers and removes push endpoints for a user.
#[derive(Clone)]
pub struct SubscriptionService {
    subscriptions: Arc<dyn SubscriptionRepository>,
    clock: Arc<dyn Clock>,
}

impl SubscriptionService {
    /// Create the service.
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            subscriptions,
            clock,
        }
    }
}

#[async_trait]
impl PushRegistry for SubscriptionService {
    async fn subscribe(
        &self,
        user_id: UserId,
        descriptor: SubscriptionDescriptor,
    ) -> Result<PushSubscription, Error> {
        descriptor
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let subscription = self
            .subscriptions
            .upsert(&user_id, &descriptor, self.clock.utc())
            .await
            .map_err(map_subscription_error)?;
        info!(
            user_id = %user_id,
            host = %descriptor.endpoint_host(),
            "push endpoint registered"
        );
        Ok(subscription)
    }

    async fn unsubscribe(&self, user_id: UserId, endpoint: String) -> Result<u64, Error> {
        if endpoint.trim().is_empty() {
            return Err(Error::invalid_request("endpoint must not be empty"));
        }
        self.subscriptions
            .delete_by_endpoint(&user_id, &endpoint)
            .await
            .map_err(map_subscription_error)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::*;
    use crate::domain::ports::MockSubscriptionRepository;
    use crate::domain::test_fixtures::{clock, start_time};
    use crate::domain::{ErrorCode, SubscriptionId, SubscriptionKeys};

    fn descriptor(endpoint: &str) -> SubscriptionDescriptor {
        SubscriptionDescriptor {
            endpoint: endpoint.to_owned(),
            keys: SubscriptionKeys {
                p256dh: "p256dh-key".to_owned(),
                auth: "auth-secret".to_owned(),
            },
            expiration_time: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn valid_descriptor_is_upserted() {
        let mut repo = MockSubscriptionRepository::new();
        repo.expect_upsert()
            .withf(|_, _, at| *at == start_time())
            .times(1)
            .returning(|user_id, descriptor, at| {
                Ok(PushSubscription {
                    id: SubscriptionId::random(),
                    user_id: *user_id,
                    descriptor: descriptor.clone(),
                    created_at: at,
                })
            });
        let service = SubscriptionService::new(Arc::new(repo), clock());
        let user_id = UserId::random();

        let stored = service
            .subscribe(user_id, descriptor("https://push.example.net/send/abc"))
            .await
            .expect("subscribed");

        assert_eq!(stored.user_id, user_id);
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://push.example.net/abc")]
    #[tokio::test]
    async fn malformed_endpoint_is_rejected(#[case] endpoint: &str) {
        let mut repo = MockSubscriptionRepository::new();
        repo.expect_upsert().never();
        let service = SubscriptionService::new(Arc::new(repo), clock());

        let error = service
            .subscribe(UserId::random(), descriptor(endpoint))
            .await
            .expect_err("invalid endpoint");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn unsubscribe_reports_removed_count() {
        let mut repo = MockSubscriptionRepository::new();
        repo.expect_delete_by_endpoint()
            .withf(|_, endpoint| endpoint == "https://push.example.net/send/abc")
            .return_once(|_, _| Ok(1));
        let service = SubscriptionService::new(Arc::new(repo), clock());

        let removed = service
            .unsubscribe(
                UserId::random(),
                "https://push.example.net/send/abc".to_owned(),
            )
            .await
            .expect("removed");

        assert_eq!(removed, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn blank_endpoint_is_rejected() {
        let service =
            SubscriptionService::new(Arc::new(MockSubscriptionRepository::new()), clock());

        let error = service
            .unsubscribe(UserId::random(), "  ".to_owned())
            .await
            .expect_err("blank");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }
}
