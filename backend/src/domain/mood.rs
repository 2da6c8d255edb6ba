//! Mood check-ins.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::{PairId, UserId};

/// How long a mood stays current.
#[must_use]
pub fn mood_freshness() -> TimeDelta {
    TimeDelta::hours(24)
}

/// Moods a member may report. Spelling is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    /// Happy.
    Happy,
    /// Frustrated.
    Frustrated,
    /// Lost.
    Lost,
    /// Okay.
    Okay,
    /// Tired.
    Tired,
    /// Excited.
    Excited,
    /// Anxious.
    Anxious,
    /// Calm.
    Calm,
}

/// Raised for a mood outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mood: {0}")]
pub struct UnknownMood(pub String);

impl Mood {
    /// Every accepted mood.
    pub const ALL: [Self; 8] = [
        Self::Happy,
        Self::Frustrated,
        Self::Lost,
        Self::Okay,
        Self::Tired,
        Self::Excited,
        Self::Anxious,
        Self::Calm,
    ];

    /// Display and storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Frustrated => "Frustrated",
            Self::Lost => "Lost",
            Self::Okay => "Okay",
            Self::Tired => "Tired",
            Self::Excited => "Excited",
            Self::Anxious => "Anxious",
            Self::Calm => "Calm",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str() == s)
            .ok_or_else(|| UnknownMood(s.to_owned()))
    }
}

/// A recorded mood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    /// Owning pair.
    pub pair_id: PairId,
    /// Reporting member.
    pub user_id: UserId,
    /// Reported mood.
    pub mood: Mood,
    /// When it was reported.
    pub created_at: DateTime<Utc>,
}

impl MoodEntry {
    /// Whether the entry still counts as current at `now`.
    #[must_use]
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.created_at >= now - mood_freshness()
    }
}
