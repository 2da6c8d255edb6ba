//! Port onto the external pair directory.
//!
//! The directory owns pairs and their members. Interaction services ask it to
//! resolve a `(pair, user)` request into a [`PairMembership`] before touching
//! any state.

use async_trait::async_trait;

use crate::domain::{PairId, PairMembership, PairedUser, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by pair directory adapters.
    pub enum PairDirectoryError {
        /// No pair with this id exists.
        PairNotFound => "pair not found",
        /// The pair is still waiting for its second member.
        PairIncomplete => "pair is not complete",
        /// The requester belongs to a different pair.
        NotMember => "user is not a member of this pair",
        /// Directory connection could not be established.
        Connection { message: String } => "pair directory connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } => "pair directory query failed: {message}",
    }
}

/// Resolve pair membership.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PairDirectory: Send + Sync {
    /// Resolve `user_id` as a member of the complete pair `pair_id`.
    async fn membership(
        &self,
        pair_id: &PairId,
        user_id: &UserId,
    ) -> Result<PairMembership, PairDirectoryError>;

    /// Every user who belongs to a complete pair, with their first pair.
    async fn paired_users(&self) -> Result<Vec<PairedUser>, PairDirectoryError>;
}
