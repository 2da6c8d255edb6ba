//! Notice board turn-taking rules.
//!
//! A pair's notice history is append-only and the turn state is derived from
//! the most recent notice alone. Nothing stores the state separately.
//!
//! ```text
//! EMPTY ──post──▶ POSTED_UNSEEN ──seen──▶ POSTED_SEEN_COOLDOWN ──time──▶ POSTED_SEEN_READY
//!                      ▲                          │ (partner may post)          │
//!                      └──────────────post────────┴─────────────────────────────┘
//! ```
//!
//! The author of a seen notice waits for the cooldown, measured from when the
//! notice was posted. Their partner may post as soon as the notice is seen.
//! Each notice may be edited once, by its author, before `editable_until`.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::{InteractionRejection, MessageContent, NoticeId, PairId, UserId, minutes_rounded_up};

/// Default cooldown in minutes.
pub const DEFAULT_NOTICE_COOLDOWN_MINUTES: u32 = 180;

/// A single notice board post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    /// Notice identity.
    pub id: NoticeId,
    /// Owning pair.
    pub pair_id: PairId,
    /// Posting member.
    pub author_id: UserId,
    /// Current body.
    pub content: MessageContent,
    /// When the notice was posted.
    pub created_at: DateTime<Utc>,
    /// When the partner acknowledged it.
    pub seen_at: Option<DateTime<Utc>>,
    /// One-shot edit latch.
    pub is_edited: bool,
    /// Deadline for the single edit, fixed at posting time.
    pub editable_until: DateTime<Utc>,
}

impl Notice {
    /// Whether the partner has acknowledged this notice.
    #[must_use]
    pub const fn is_seen(&self) -> bool {
        self.seen_at.is_some()
    }
}

/// Turn state derived from the latest notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeTurnState {
    /// No notice has been posted for the pair.
    Empty,
    /// The latest notice awaits acknowledgement.
    PostedUnseen,
    /// Seen, but the author is still inside the cooldown.
    PostedSeenCooldown {
        /// Whole minutes until the author may post again.
        remaining_minutes: u64,
    },
    /// Seen and the cooldown has elapsed.
    PostedSeenReady,
}

impl NoticeTurnState {
    /// Stable uppercase name used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "EMPTY",
            Self::PostedUnseen => "POSTED_UNSEEN",
            Self::PostedSeenCooldown { .. } => "POSTED_SEEN_COOLDOWN",
            Self::PostedSeenReady => "POSTED_SEEN_READY",
        }
    }
}

/// Outcome of a seen request that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeenTransition {
    /// The notice moves from unseen to seen.
    Apply,
    /// The notice was already seen; nothing changes.
    AlreadySeen,
}

/// Cooldown-parameterised turn rules.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use pairspace::domain::{NoticeRules, NoticeTurnState};
///
/// let rules = NoticeRules::default();
/// assert_eq!(rules.state(None, Utc::now()), NoticeTurnState::Empty);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeRules {
    cooldown: TimeDelta,
}

impl Default for NoticeRules {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_NOTICE_COOLDOWN_MINUTES)
    }
}

impl NoticeRules {
    /// Rules with a cooldown of `minutes`.
    #[must_use]
    pub fn from_minutes(minutes: u32) -> Self {
        Self {
            cooldown: TimeDelta::minutes(i64::from(minutes)),
        }
    }

    /// Configured cooldown.
    #[must_use]
    pub const fn cooldown(&self) -> TimeDelta {
        self.cooldown
    }

    /// Edit deadline for a notice posted at `created_at`.
    #[must_use]
    pub fn editable_until(&self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + self.cooldown
    }

    /// Build a fresh notice authored at `now`.
    #[must_use]
    pub fn draft(
        &self,
        pair_id: PairId,
        author_id: UserId,
        content: MessageContent,
        now: DateTime<Utc>,
    ) -> Notice {
        Notice {
            id: NoticeId::random(),
            pair_id,
            author_id,
            content,
            created_at: now,
            seen_at: None,
            is_edited: false,
            editable_until: self.editable_until(now),
        }
    }

    fn cooldown_remaining(&self, notice: &Notice, now: DateTime<Utc>) -> Option<u64> {
        let remaining = notice.created_at + self.cooldown - now;
        (remaining > TimeDelta::zero()).then(|| minutes_rounded_up(remaining))
    }

    /// Derive the turn state at `now`.
    #[must_use]
    pub fn state(&self, latest: Option<&Notice>, now: DateTime<Utc>) -> NoticeTurnState {
        let Some(notice) = latest else {
            return NoticeTurnState::Empty;
        };
        if !notice.is_seen() {
            return NoticeTurnState::PostedUnseen;
        }
        match self.cooldown_remaining(notice, now) {
            Some(remaining_minutes) => NoticeTurnState::PostedSeenCooldown { remaining_minutes },
            None => NoticeTurnState::PostedSeenReady,
        }
    }

    /// Decide whether `author_id` may post at `now`.
    ///
    /// # Errors
    /// Returns [`InteractionRejection::PendingUnseen`] while the latest notice
    /// is unseen, whoever asks, and [`InteractionRejection::CooldownActive`]
    /// when the requester authored the latest notice and the cooldown has not
    /// elapsed.
    pub fn evaluate_post(
        &self,
        latest: Option<&Notice>,
        author_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<(), InteractionRejection> {
        let Some(notice) = latest else {
            return Ok(());
        };
        if !notice.is_seen() {
            return Err(InteractionRejection::PendingUnseen);
        }
        if notice.author_id != *author_id {
            return Ok(());
        }
        match self.cooldown_remaining(notice, now) {
            Some(remaining_minutes) => {
                Err(InteractionRejection::CooldownActive { remaining_minutes })
            }
            None => Ok(()),
        }
    }

    /// Decide whether `author_id` may edit the latest notice at `now`.
    ///
    /// # Errors
    /// Returns [`InteractionRejection::NoEditableNotice`] when there is no
    /// notice or the requester did not write it,
    /// [`InteractionRejection::AlreadyEdited`] once the single edit is used,
    /// and [`InteractionRejection::EditWindowClosed`] past the deadline.
    pub fn evaluate_edit<'a>(
        &self,
        latest: Option<&'a Notice>,
        author_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<&'a Notice, InteractionRejection> {
        let notice = latest
            .filter(|notice| notice.author_id == *author_id)
            .ok_or(InteractionRejection::NoEditableNotice)?;
        if notice.is_edited {
            return Err(InteractionRejection::AlreadyEdited);
        }
        if now > notice.editable_until {
            return Err(InteractionRejection::EditWindowClosed);
        }
        Ok(notice)
    }
}

/// Decide what marking `notice` as seen by `requester_id` does.
///
/// # Errors
/// Returns [`InteractionRejection::OwnNotice`] when the requester wrote it.
pub fn evaluate_mark_seen(
    notice: &Notice,
    requester_id: &UserId,
) -> Result<SeenTransition, InteractionRejection> {
    if notice.author_id == *requester_id {
        return Err(InteractionRejection::OwnNotice);
    }
    if notice.is_seen() {
        Ok(SeenTransition::AlreadySeen)
    } else {
        Ok(SeenTransition::Apply)
    }
}
