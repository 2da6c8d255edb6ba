//! Rate-limited action ledger rules.
//!
//! The ledger is append-only. Counting happens over a per-kind window that is
//! either a rolling 24 hours or the current UTC calendar day. Sutta clicks are
//! never blocked; their count only picks the notification tier. Frustration
//! kinds are uncapped unless a cap is configured.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::{PairId, UserId, minutes_rounded_up};

/// Action kinds a member may record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Check-in with escalating notification tiers.
    Sutta,
    /// Frustration with the current project.
    Project,
    /// Frustration with a junior colleague.
    Junior,
    /// Thinking about resigning.
    Resign,
}

/// Raised when a string names no known action kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action kind: {0}")]
pub struct UnknownActionKind(pub String);

impl ActionKind {
    /// Every accepted kind.
    pub const ALL: [Self; 4] = [Self::Sutta, Self::Project, Self::Junior, Self::Resign];

    /// Wire and storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sutta => "sutta",
            Self::Project => "project",
            Self::Junior => "junior",
            Self::Resign => "resign",
        }
    }

    /// Whether this kind is one of the frustration buttons.
    #[must_use]
    pub const fn is_frustration(self) -> bool {
        !matches!(self, Self::Sutta)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = UnknownActionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownActionKind(s.to_owned()))
    }
}

/// Counting window for an action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionWindow {
    /// The 24 hours ending now.
    #[default]
    Rolling24h,
    /// The current calendar day in UTC.
    CalendarDayUtc,
}

/// Raised when a configured window name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action window: {0} (expected rolling-24h or calendar-day)")]
pub struct UnknownActionWindow(pub String);

impl FromStr for ActionWindow {
    type Err = UnknownActionWindow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rolling-24h" => Ok(Self::Rolling24h),
            "calendar-day" => Ok(Self::CalendarDayUtc),
            other => Err(UnknownActionWindow(other.to_owned())),
        }
    }
}

impl ActionWindow {
    /// Earliest timestamp counted at `now`.
    #[must_use]
    pub fn start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Rolling24h => now - TimeDelta::hours(24),
            Self::CalendarDayUtc => now.date_naive().and_time(NaiveTime::MIN).and_utc(),
        }
    }

    /// When the slot held by `oldest` becomes free again.
    #[must_use]
    pub fn reopens_at(self, oldest: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Rolling24h => oldest + TimeDelta::hours(24),
            Self::CalendarDayUtc => self.start(now) + TimeDelta::days(1),
        }
    }
}

/// Window and optional cap applied to one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KindPolicy {
    /// Counting window.
    pub window: ActionWindow,
    /// Maximum accepted actions per window; `None` means uncapped.
    pub cap: Option<u32>,
}

/// Ledger configuration.
///
/// Sutta clicks are always uncapped. All frustration kinds share one policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerPolicy {
    sutta_window: ActionWindow,
    frustration: KindPolicy,
}

impl LedgerPolicy {
    /// Build a policy with explicit windows and an optional frustration cap.
    #[must_use]
    pub const fn new(
        sutta_window: ActionWindow,
        frustration_window: ActionWindow,
        frustration_cap: Option<u32>,
    ) -> Self {
        Self {
            sutta_window,
            frustration: KindPolicy {
                window: frustration_window,
                cap: frustration_cap,
            },
        }
    }

    /// Policy governing `kind`.
    #[must_use]
    pub const fn for_kind(&self, kind: ActionKind) -> KindPolicy {
        if kind.is_frustration() {
            self.frustration
        } else {
            KindPolicy {
                window: self.sutta_window,
                cap: None,
            }
        }
    }
}

/// Append request handed to the ledger repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAppend {
    /// Pair scope.
    pub pair_id: PairId,
    /// Acting member.
    pub actor_id: UserId,
    /// Kind being recorded.
    pub kind: ActionKind,
    /// Timestamp of the click.
    pub occurred_at: DateTime<Utc>,
    /// Start of the counting window at `occurred_at`.
    pub window_start: DateTime<Utc>,
    /// Refuse the append when this many records already exist in the window.
    pub cap: Option<u32>,
}

/// Result of an append attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerAppendOutcome {
    /// Whether a record was written.
    pub accepted: bool,
    /// Records in the window before this attempt.
    pub prior_count: u32,
    /// Oldest record in the window before this attempt.
    pub oldest_in_window: Option<DateTime<Utc>>,
}

/// Count of records in a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowSummary {
    /// Records in the window.
    pub count: u32,
    /// Oldest record in the window.
    pub oldest: Option<DateTime<Utc>>,
}

/// Notification tier of a sutta click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuttaTier {
    /// First click in the window.
    Normal,
    /// Any repeat click in the window.
    Sos,
}

impl SuttaTier {
    /// Tier for a click preceded by `prior_count` clicks in the window.
    #[must_use]
    pub const fn for_prior_count(prior_count: u32) -> Self {
        if prior_count == 0 {
            Self::Normal
        } else {
            Self::Sos
        }
    }
}

/// Whether `summary` still has room under `policy`.
#[must_use]
pub fn has_capacity(policy: KindPolicy, summary: WindowSummary) -> bool {
    policy.cap.is_none_or(|cap| summary.count < cap)
}

/// Minutes until a capped kind accepts another click, rounded up.
///
/// Returns `None` when the kind currently has capacity.
#[must_use]
pub fn minutes_until_available(
    policy: KindPolicy,
    summary: WindowSummary,
    now: DateTime<Utc>,
) -> Option<u64> {
    if has_capacity(policy, summary) {
        return None;
    }
    let oldest = summary.oldest.unwrap_or(now);
    Some(minutes_rounded_up(
        policy.window.reopens_at(oldest, now) - now,
    ))
}
