//! Driving ports for mood check-ins.

use async_trait::async_trait;

use crate::domain::{Error, Mood, MoodEntry, PairActor};

/// Record moods.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MoodCommand: Send + Sync {
    /// Record the requester's mood and tell the partner.
    async fn record(&self, actor: PairActor, mood: Mood) -> Result<MoodEntry, Error>;
}

/// Read moods.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MoodQuery: Send + Sync {
    /// The partner's mood from the last 24 hours, if any.
    async fn partner_mood(&self, actor: PairActor) -> Result<Option<MoodEntry>, Error>;
}
