//! Gossip feed service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::pair_access::resolve_membership;
use crate::domain::ports::{
    GossipFeed, GossipRepository, GossipRepositoryError, NotificationSink, PairDirectory,
    submit_detached,
};
use crate::domain::{
    DispatchRequest, Error, GossipId, GossipMessage, InteractionRejection, MessageContent,
    NotificationEvent, PairActor,
};

fn map_gossip_error(error: GossipRepositoryError) -> Error {
    match error {
        GossipRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("gossip repository unavailable: {message}"))
        }
        GossipRepositoryError::Query { message } => {
            Error::internal(format!("gossip repository error: {message}"))
        }
    }
}

/// Service behind the gossip feed.
#[derive(Clone)]
pub struct GossipService {
    directory: Arc<dyn PairDirectory>,
    messages: Arc<dyn GossipRepository>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl GossipService {
    /// Create the service.
    pub fn new(
        directory: Arc<dyn PairDirectory>,
        messages: Arc<dyn GossipRepository>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            directory,
            messages,
            sink,
            clock,
        }
    }
}

#[async_trait]
impl GossipFeed for GossipService {
    async fn post(
        &self,
        actor: PairActor,
        content: MessageContent,
    ) -> Result<GossipMessage, Error> {
        let membership = resolve_membership(self.directory.as_ref(), &actor).await?;
        let message = GossipMessage::draft(
            membership.pair_id,
            membership.member.id,
            content,
            self.clock.utc(),
        );
        self.messages
            .insert(&message)
            .await
            .map_err(map_gossip_error)?;
        submit_detached(
            self.sink.as_ref(),
            DispatchRequest::new(
                membership.partner.id,
                membership.pair_id,
                NotificationEvent::Gossip {
                    name: membership.member.display_name,
                },
            ),
        );
        Ok(message)
    }

    async fn list_active(&self, actor: PairActor) -> Result<Vec<GossipMessage>, Error> {
        let membership = resolve_membership(self.directory.as_ref(), &actor).await?;
        self.messages
            .take_active(&membership.pair_id, &membership.partner.id)
            .await
            .map_err(map_gossip_error)
    }

    async fn acknowledge(
        &self,
        actor: PairActor,
        message_id: GossipId,
    ) -> Result<GossipMessage, Error> {
        let membership = resolve_membership(self.directory.as_ref(), &actor).await?;
        let message = self
            .messages
            .find(&membership.pair_id, &message_id)
            .await
            .map_err(map_gossip_error)?
            .ok_or_else(|| Error::not_found(format!("gossip message {message_id} not found")))?;
        message.check_acknowledge(&membership.member.id)?;

        let now = self.clock.utc();
        let applied = self
            .messages
            .acknowledge(&message.id, now)
            .await
            .map_err(map_gossip_error)?;
        if !applied {
            return Err(InteractionRejection::AlreadyAcknowledged.into());
        }

        submit_detached(
            self.sink.as_ref(),
            DispatchRequest::new(
                message.author_id,
                membership.pair_id,
                NotificationEvent::GossipReaction {
                    name: membership.member.display_name,
                },
            ),
        );
        Ok(GossipMessage {
            seen: true,
            acknowledged_at: Some(now),
            ..message
        })
    }
}
