//! Typed rejections for interaction rules.
//!
//! A rejection is a routine outcome, not a fault: the client renders it as a
//! precise message ("wait 42 minutes") rather than a generic failure. Each
//! variant converts into an `invalid_request` [`Error`] carrying a stable
//! uppercase reason plus any timing or count metadata.

use chrono::TimeDelta;
use serde_json::{Map, Value, json};

use super::Error;

/// Why an interaction was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionRejection {
    /// The latest notice has not been seen by its recipient yet.
    PendingUnseen,
    /// The requester's own seen notice is still inside the cooldown.
    CooldownActive {
        /// Whole minutes until posting is allowed, rounded up.
        remaining_minutes: u64,
    },
    /// There is no notice the requester may edit.
    NoEditableNotice,
    /// The notice already used its single edit.
    AlreadyEdited,
    /// The edit deadline fixed at posting time has passed.
    EditWindowClosed,
    /// The requester tried to acknowledge their own notice.
    OwnNotice,
    /// The requester tried to acknowledge their own gossip message.
    OwnMessage,
    /// The gossip message was already acknowledged.
    AlreadyAcknowledged,
    /// A capped action kind has no attempts left in the current window.
    DailyLimitReached {
        /// Whole minutes until the next attempt is allowed, rounded up.
        remaining_minutes: u64,
        /// Accepted actions already in the window.
        click_count: u32,
    },
}

impl InteractionRejection {
    /// Stable machine-readable reason.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::PendingUnseen => "PENDING_UNSEEN",
            Self::CooldownActive { .. } => "COOLDOWN_ACTIVE",
            Self::NoEditableNotice => "NO_EDITABLE_NOTICE",
            Self::AlreadyEdited => "ALREADY_EDITED",
            Self::EditWindowClosed => "EDIT_WINDOW_CLOSED",
            Self::OwnNotice => "OWN_NOTICE",
            Self::OwnMessage => "OWN_MESSAGE",
            Self::AlreadyAcknowledged => "ALREADY_ACKNOWLEDGED",
            Self::DailyLimitReached { .. } => "DAILY_LIMIT_REACHED",
        }
    }

    /// Human-readable explanation.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::PendingUnseen => "the latest notice has not been seen yet".to_owned(),
            Self::CooldownActive { remaining_minutes } => {
                format!("you can post again in {remaining_minutes} minutes")
            }
            Self::NoEditableNotice => "there is no notice you can edit".to_owned(),
            Self::AlreadyEdited => "a notice can only be edited once".to_owned(),
            Self::EditWindowClosed => "the edit window for this notice has closed".to_owned(),
            Self::OwnNotice => "you cannot mark your own notice as seen".to_owned(),
            Self::OwnMessage => "you cannot acknowledge your own message".to_owned(),
            Self::AlreadyAcknowledged => "this message was already acknowledged".to_owned(),
            Self::DailyLimitReached { remaining_minutes, .. } => {
                format!("daily limit reached; try again in {remaining_minutes} minutes")
            }
        }
    }

    /// Minutes until the rejection lifts, when it is time-bound.
    #[must_use]
    pub const fn remaining_minutes(&self) -> Option<u64> {
        match self {
            Self::CooldownActive { remaining_minutes }
            | Self::DailyLimitReached {
                remaining_minutes, ..
            } => Some(*remaining_minutes),
            _ => None,
        }
    }

    /// Accepted actions already in the window, for capped actions.
    #[must_use]
    pub const fn click_count(&self) -> Option<u32> {
        match self {
            Self::DailyLimitReached { click_count, .. } => Some(*click_count),
            _ => None,
        }
    }

    /// Rebuild a rejection from its wire reason and metadata.
    #[must_use]
    pub(crate) fn from_wire(
        reason: &str,
        remaining_minutes: Option<u64>,
        click_count: Option<u32>,
    ) -> Option<Self> {
        let remaining_minutes = remaining_minutes.unwrap_or(0);
        let rejection = match reason {
            "PENDING_UNSEEN" => Self::PendingUnseen,
            "COOLDOWN_ACTIVE" => Self::CooldownActive { remaining_minutes },
            "NO_EDITABLE_NOTICE" => Self::NoEditableNotice,
            "ALREADY_EDITED" => Self::AlreadyEdited,
            "EDIT_WINDOW_CLOSED" => Self::EditWindowClosed,
            "OWN_NOTICE" => Self::OwnNotice,
            "OWN_MESSAGE" => Self::OwnMessage,
            "ALREADY_ACKNOWLEDGED" => Self::AlreadyAcknowledged,
            "DAILY_LIMIT_REACHED" => Self::DailyLimitReached {
                remaining_minutes,
                click_count: click_count.unwrap_or(0),
            },
            _ => return None,
        };
        Some(rejection)
    }

    #[must_use]
    pub(crate) fn details(&self) -> Value {
        let mut details = Map::new();
        details.insert("error".to_owned(), json!(self.reason()));
        if let Some(minutes) = self.remaining_minutes() {
            details.insert("remainingMinutes".to_owned(), json!(minutes));
        }
        if let Some(count) = self.click_count() {
            details.insert("clickCount".to_owned(), json!(count));
        }
        Value::Object(details)
    }
}

impl From<InteractionRejection> for Error {
    fn from(value: InteractionRejection) -> Self {
        Self::invalid_request(value.message()).with_rejection(value)
    }
}

/// Convert a remaining duration into whole minutes, rounding up.
///
/// Negative durations clamp to zero.
///
/// # Examples
/// ```
/// use chrono::TimeDelta;
/// use pairspace::domain::minutes_rounded_up;
///
/// assert_eq!(minutes_rounded_up(TimeDelta::minutes(180)), 180);
/// assert_eq!(minutes_rounded_up(TimeDelta::seconds(61)), 2);
/// assert_eq!(minutes_rounded_up(TimeDelta::seconds(-5)), 0);
/// ```
#[must_use]
pub fn minutes_rounded_up(remaining: TimeDelta) -> u64 {
    u64::try_from(remaining.num_milliseconds())
        .unwrap_or(0)
        .div_ceil(60_000)
}
