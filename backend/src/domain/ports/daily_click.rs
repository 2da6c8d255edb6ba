//! Driving ports for the daily buttons (sutta and frustration kinds).

use async_trait::async_trait;

use crate::domain::{ActionKind, Error, PairActor};

/// A button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyClickRequest {
    /// Who pressed it, and in which pair.
    pub actor: PairActor,
    /// Which button.
    pub kind: ActionKind,
    /// Optional free text for frustration kinds.
    pub vent_text: Option<String>,
}

/// Result of an accepted press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickOutcome {
    /// Escalation flag, only reported for sutta clicks.
    pub is_sos: Option<bool>,
    /// Accepted presses in the window including this one.
    pub click_count: u32,
}

/// Current counters for one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickStatus {
    /// Which button.
    pub kind: ActionKind,
    /// Accepted presses in the current window.
    pub count_today: u32,
    /// Whether another press would be accepted now.
    pub can_click: bool,
    /// Minutes until the next press is accepted, when capped.
    pub remaining_minutes: Option<u64>,
}

/// Record button presses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DailyClickCommand: Send + Sync {
    /// Record a press and notify the partner.
    ///
    /// # Errors
    /// Membership failures, a reached cap, or storage failures.
    async fn click(&self, request: DailyClickRequest) -> Result<ClickOutcome, Error>;
}

/// Read button counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DailyClickQuery: Send + Sync {
    /// Counters for `kind` in the current window.
    async fn status(&self, actor: PairActor, kind: ActionKind) -> Result<ClickStatus, Error>;
}
