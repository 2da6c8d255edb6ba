//! Turn a notification event into a history entry plus push attempts.
//!
//! Dispatch never fails. The history entry is the durable channel; push is
//! best effort. Sends to a user's endpoints run concurrently and one failing
//! endpoint never affects its siblings. Endpoints the push service reports as
//! gone are pruned; every other failure leaves the subscription in place.

use std::sync::Arc;

use futures_util::future::join_all;
use mockable::Clock;
use tracing::{debug, info, warn};

use super::{
    DispatchRequest, NotificationComposer, NotificationQueueEntry, PushMessage, PushSubscription,
};
use crate::domain::NotificationId;
use crate::domain::ports::{NotificationRepository, PushTransport, SubscriptionRepository};

/// Counters describing one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchReport {
    /// History entry id, when the append succeeded.
    pub entry_id: Option<NotificationId>,
    /// Endpoints a send was attempted for.
    pub attempted: usize,
    /// Endpoints that accepted the message.
    pub delivered: usize,
    /// Endpoints removed because the push service reported them gone.
    pub pruned: usize,
    /// Endpoints that failed and were kept.
    pub failed: usize,
}

enum Delivery {
    Delivered,
    Pruned,
    Failed,
}

/// Records notifications and fans them out to push endpoints.
pub struct NotificationDispatcher {
    notifications: Arc<dyn NotificationRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    transport: Arc<dyn PushTransport>,
    composer: Arc<NotificationComposer>,
    clock: Arc<dyn Clock>,
}

impl NotificationDispatcher {
    /// Wire a dispatcher from its collaborators.
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        transport: Arc<dyn PushTransport>,
        composer: Arc<NotificationComposer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            notifications,
            subscriptions,
            transport,
            composer,
            clock,
        }
    }

    /// Record and deliver one notification.
    pub async fn dispatch(&self, request: DispatchRequest) -> DispatchReport {
        let DispatchRequest {
            recipient_id,
            pair_id,
            event,
            ..
        } = request;
        let kind = event.kind();
        let composed = self.composer.compose(&event);
        let entry = NotificationQueueEntry {
            id: NotificationId::random(),
            recipient_id,
            pair_id,
            kind,
            payload: event.payload(),
            read: false,
            created_at: self.clock.utc(),
        };

        let mut report = DispatchReport::default();
        match self.notifications.append(&entry).await {
            Ok(()) => report.entry_id = Some(entry.id),
            Err(error) => {
                warn!(%error, %kind, %pair_id, "failed to record notification history");
            }
        }

        let subscriptions = match self.subscriptions.list_for_user(&recipient_id).await {
            Ok(subscriptions) => subscriptions,
            Err(error) => {
                warn!(%error, %kind, %pair_id, "failed to load push subscriptions");
                return report;
            }
        };

        let message = PushMessage {
            title: composed.title,
            body: composed.body,
            pair_id,
        };
        let deliveries = join_all(
            subscriptions
                .iter()
                .map(|subscription| self.deliver(subscription, &message)),
        )
        .await;

        report.attempted = deliveries.len();
        for delivery in deliveries {
            match delivery {
                Delivery::Delivered => report.delivered += 1,
                Delivery::Pruned => report.pruned += 1,
                Delivery::Failed => report.failed += 1,
            }
        }
        debug!(
            %kind,
            %pair_id,
            attempted = report.attempted,
            delivered = report.delivered,
            pruned = report.pruned,
            failed = report.failed,
            "notification dispatched"
        );
        report
    }

    async fn deliver(&self, subscription: &PushSubscription, message: &PushMessage) -> Delivery {
        let error = match self.transport.send(subscription, message).await {
            Ok(()) => return Delivery::Delivered,
            Err(error) => error,
        };
        let endpoint_host = subscription.descriptor.endpoint_host();
        if !error.is_terminal() {
            warn!(
                %error,
                subscription_id = %subscription.id,
                %endpoint_host,
                "push delivery failed; keeping subscription"
            );
            return Delivery::Failed;
        }
        match self.subscriptions.delete(&subscription.id).await {
            Ok(_) => {
                info!(
                    %error,
                    subscription_id = %subscription.id,
                    %endpoint_host,
                    "pruned expired push subscription"
                );
                Delivery::Pruned
            }
            Err(delete_error) => {
                warn!(
                    error = %delete_error,
                    subscription_id = %subscription.id,
                    "failed to prune expired push subscription"
                );
                Delivery::Failed
            }
        }
    }
}
