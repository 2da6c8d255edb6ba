//! Gossip messages: unlimited, ephemeral, acknowledged once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GossipId, InteractionRejection, MessageContent, PairId, UserId};

/// A gossip message.
///
/// Acknowledged messages stay stored but drop out of the recipient's active
/// listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GossipMessage {
    /// Message identity.
    pub id: GossipId,
    /// Owning pair.
    pub pair_id: PairId,
    /// Posting member.
    pub author_id: UserId,
    /// Body.
    pub content: MessageContent,
    /// When it was posted.
    pub created_at: DateTime<Utc>,
    /// Set the first time the recipient lists it.
    pub seen: bool,
    /// Set once when the recipient reacts or re-reads it.
    pub acknowledged_at: Option<DateTime<Utc>>,
}

impl GossipMessage {
    /// Build a new unseen, unacknowledged message.
    #[must_use]
    pub fn draft(
        pair_id: PairId,
        author_id: UserId,
        content: MessageContent,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: GossipId::random(),
            pair_id,
            author_id,
            content,
            created_at: now,
            seen: false,
            acknowledged_at: None,
        }
    }

    /// Whether the terminal acknowledgement has happened.
    #[must_use]
    pub const fn is_acknowledged(&self) -> bool {
        self.acknowledged_at.is_some()
    }

    /// Check that `reader_id` may acknowledge this message.
    ///
    /// # Errors
    /// [`InteractionRejection::OwnMessage`] for the author and
    /// [`InteractionRejection::AlreadyAcknowledged`] for a repeat.
    pub fn check_acknowledge(&self, reader_id: &UserId) -> Result<(), InteractionRejection> {
        if self.author_id == *reader_id {
            return Err(InteractionRejection::OwnMessage);
        }
        if self.is_acknowledged() {
            return Err(InteractionRejection::AlreadyAcknowledged);
        }
        Ok(())
    }
}
