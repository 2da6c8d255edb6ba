//! Port for gossip storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{GossipId, GossipMessage, PairId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by gossip repository adapters.
    pub enum GossipRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "gossip repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "gossip repository query failed: {message}",
    }
}

/// Gossip persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GossipRepository: Send + Sync {
    /// Store a new message.
    async fn insert(&self, message: &GossipMessage) -> Result<(), GossipRepositoryError>;

    /// Unacknowledged messages written by `author_id` in the pair, oldest
    /// first, flagging each as seen in the same operation.
    async fn take_active(
        &self,
        pair_id: &PairId,
        author_id: &UserId,
    ) -> Result<Vec<GossipMessage>, GossipRepositoryError>;

    /// Look up a message within a pair.
    async fn find(
        &self,
        pair_id: &PairId,
        message_id: &GossipId,
    ) -> Result<Option<GossipMessage>, GossipRepositoryError>;

    /// Set the acknowledgement timestamp. Returns `false` if it was already
    /// set.
    async fn acknowledge(
        &self,
        message_id: &GossipId,
        at: DateTime<Utc>,
    ) -> Result<bool, GossipRepositoryError>;
}
