//! Driving ports for the turn-gated notice board.

use async_trait::async_trait;

use crate::domain::{Error, InteractionRejection, MessageContent, Notice, NoticeTurnState, PairActor};

/// Board readout for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeStatus {
    /// Latest notice, if any.
    pub notice: Option<Notice>,
    /// Derived turn state.
    pub state: NoticeTurnState,
    /// Whether the requester may post now.
    pub can_post: bool,
    /// The rejection a post would receive now.
    pub reason: Option<InteractionRejection>,
}

/// Mutate the notice board.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoticeBoardCommand: Send + Sync {
    /// Post a new notice when the turn rules allow it.
    async fn post(&self, actor: PairActor, content: MessageContent) -> Result<Notice, Error>;

    /// Use the author's single edit on the latest notice.
    async fn edit(&self, actor: PairActor, content: MessageContent) -> Result<Notice, Error>;

    /// Acknowledge the partner's latest notice.
    async fn mark_seen(&self, actor: PairActor) -> Result<Notice, Error>;
}

/// Read the notice board.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoticeBoardQuery: Send + Sync {
    /// Latest notice plus the requester's posting eligibility.
    async fn status(&self, actor: PairActor) -> Result<NoticeStatus, Error>;
}
