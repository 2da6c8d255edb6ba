//! Driving port for gossip.

use async_trait::async_trait;

use crate::domain::{Error, GossipId, GossipMessage, MessageContent, PairActor};

/// Post, read, and acknowledge gossip.
///
/// Reading is not side-effect free: listing marks the returned messages seen.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GossipFeed: Send + Sync {
    /// Post a message for the partner. Never turn-gated.
    async fn post(&self, actor: PairActor, content: MessageContent)
    -> Result<GossipMessage, Error>;

    /// The partner's unacknowledged messages, oldest first.
    async fn list_active(&self, actor: PairActor) -> Result<Vec<GossipMessage>, Error>;

    /// React to, or re-read, a partner message. Terminal.
    async fn acknowledge(
        &self,
        actor: PairActor,
        message_id: GossipId,
    ) -> Result<GossipMessage, Error>;
}
