//! Pair membership as seen by interaction services.
//!
//! Pairs are owned by an external directory. Services only need to know who
//! the requester is, who their partner is, and what to call each of them in
//! notification text.

use serde::{Deserialize, Serialize};

use super::{PairId, UserId};

/// One side of a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Stable user identity.
    pub id: UserId,
    /// Name used in notification text.
    pub display_name: String,
}

/// A validated, complete pair from the point of view of one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairMembership {
    /// The pair being addressed.
    pub pair_id: PairId,
    /// The requesting member.
    pub member: Member,
    /// The other member.
    pub partner: Member,
}

impl PairMembership {
    /// Whether `user_id` is the requesting member.
    #[must_use]
    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.member.id == *user_id
    }
}

/// A user together with the pair they belong to.
///
/// Used by jobs that fan out over every paired user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairedUser {
    /// The user.
    pub user_id: UserId,
    /// Their first pair.
    pub pair_id: PairId,
}

/// A user acting inside a pair. Every driving port takes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairActor {
    /// The addressed pair.
    pub pair_id: PairId,
    /// The authenticated user.
    pub user_id: UserId,
}

impl PairActor {
    /// Bundle a pair and a user.
    #[must_use]
    pub const fn new(pair_id: PairId, user_id: UserId) -> Self {
        Self { pair_id, user_id }
    }
}
