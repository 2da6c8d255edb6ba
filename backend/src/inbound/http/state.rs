//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they stay testable without storage or network access.

use std::fmt;
use std::sync::Arc;

use zeroize::Zeroizing;

use crate::domain::ports::{
    DailyClickCommand, DailyClickQuery, GossipFeed, MoodCommand, MoodPromptCommand, MoodQuery,
    NoticeBoardCommand, NoticeBoardQuery, NotificationInbox, PushRegistry,
};

/// Shared secret guarding the scheduled mood prompt trigger.
///
/// Zeroed on drop and never printed.
#[derive(Clone)]
pub struct CronSecret(Arc<Zeroizing<String>>);

impl CronSecret {
    /// Wrap `secret`. Blank secrets are treated as absent.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            None
        } else {
            Some(Self(Arc::new(Zeroizing::new(secret))))
        }
    }

    /// Constant-time comparison against a presented token.
    #[must_use]
    pub fn matches(&self, presented: &str) -> bool {
        let expected = self.0.as_bytes();
        let presented = presented.as_bytes();
        if expected.len() != presented.len() {
            return false;
        }
        expected
            .iter()
            .zip(presented)
            .fold(0_u8, |acc, (left, right)| acc | (left ^ right))
            == 0
    }
}

impl fmt::Debug for CronSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CronSecret(<redacted>)")
    }
}

/// Parameter object bundling every driving port the handlers call.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Sutta and frustration buttons.
    pub daily_click: Arc<dyn DailyClickCommand>,
    /// Button status readout.
    pub daily_click_query: Arc<dyn DailyClickQuery>,
    /// Notice posting, editing, and acknowledgement.
    pub notices: Arc<dyn NoticeBoardCommand>,
    /// Notice status readout.
    pub notices_query: Arc<dyn NoticeBoardQuery>,
    /// Gossip feed.
    pub gossip: Arc<dyn GossipFeed>,
    /// Mood recording.
    pub moods: Arc<dyn MoodCommand>,
    /// Partner mood lookup.
    pub moods_query: Arc<dyn MoodQuery>,
    /// In-app notification history.
    pub inbox: Arc<dyn NotificationInbox>,
    /// Push endpoint registration.
    pub push: Arc<dyn PushRegistry>,
    /// Scheduled mood prompt.
    pub mood_prompt: Arc<dyn MoodPromptCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Sutta and frustration buttons.
    pub daily_click: Arc<dyn DailyClickCommand>,
    /// Button status readout.
    pub daily_click_query: Arc<dyn DailyClickQuery>,
    /// Notice posting, editing, and acknowledgement.
    pub notices: Arc<dyn NoticeBoardCommand>,
    /// Notice status readout.
    pub notices_query: Arc<dyn NoticeBoardQuery>,
    /// Gossip feed.
    pub gossip: Arc<dyn GossipFeed>,
    /// Mood recording.
    pub moods: Arc<dyn MoodCommand>,
    /// Partner mood lookup.
    pub moods_query: Arc<dyn MoodQuery>,
    /// In-app notification history.
    pub inbox: Arc<dyn NotificationInbox>,
    /// Push endpoint registration.
    pub push: Arc<dyn PushRegistry>,
    /// Scheduled mood prompt.
    pub mood_prompt: Arc<dyn MoodPromptCommand>,
    /// Secret for `/cron/mood-prompt`; the trigger refuses every call when
    /// absent.
    pub cron_secret: Option<CronSecret>,
}

impl HttpState {
    /// Construct state from the ports bundle and an optional cron secret.
    #[must_use]
    pub fn new(ports: HttpStatePorts, cron_secret: Option<CronSecret>) -> Self {
        let HttpStatePorts {
            daily_click,
            daily_click_query,
            notices,
            notices_query,
            gossip,
            moods,
            moods_query,
            inbox,
            push,
            mood_prompt,
        } = ports;
        Self {
            daily_click,
            daily_click_query,
            notices,
            notices_query,
            gossip,
            moods,
            moods_query,
            inbox,
            push,
            mood_prompt,
            cron_secret,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", None)]
    #[case("   ", None)]
    #[case("s3cret", Some(()))]
    fn blank_secrets_are_absent(#[case] raw: &str, #[case] expected: Option<()>) {
        assert_eq!(CronSecret::new(raw).map(|_| ()), expected);
    }

    #[rstest]
    #[case("s3cret", true)]
    #[case("s3cres", false)]
    #[case("s3cret ", false)]
    #[case("", false)]
    fn secret_matching_is_exact(#[case] presented: &str, #[case] expected: bool) {
        let secret = CronSecret::new("s3cret").expect("non-blank");
        assert_eq!(secret.matches(presented), expected);
    }

    #[rstest]
    fn debug_output_is_redacted() {
        let secret = CronSecret::new("s3cret").expect("non-blank");
        assert_eq!(format!("{secret:?}"), "CronSecret(<redacted>)");
    }
}
