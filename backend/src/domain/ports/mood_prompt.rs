//! Driving port for the scheduled mood prompt.

use async_trait::async_trait;

use crate::domain::Error;

/// Counts reported by a prompt run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoodPromptReport {
    /// Prompts queued for delivery.
    pub sent: u32,
    /// Prompts that could not be queued.
    pub failed: u32,
    /// Paired users considered.
    pub total: u32,
}

/// Prompt every paired user to record a mood.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MoodPromptCommand: Send + Sync {
    /// Queue a prompt for each paired user.
    async fn prompt_all(&self) -> Result<MoodPromptReport, Error>;
}
