//! Notification text selection.
//!
//! Every kind has a fixed list of body templates and one is chosen uniformly
//! per call so recurring events do not read the same way every time. The
//! choice is driven by a caller-supplied RNG: seed it to get repeatable text.

use std::sync::Mutex;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{NotificationEvent, NotificationKind};
use crate::domain::ActionKind;

/// Title used unless a kind overrides it.
pub const DEFAULT_TITLE: &str = "Space";

const SUTTA_NORMAL: &[&str] = &[
    "{name} is taking a sutta break.",
    "{name} stepped outside for a smoke.",
    "Smoke break for {name}.",
    "{name} is out for a quick sutta.",
    "{name} just headed out for a cigarette.",
    "Sutta o'clock for {name}.",
    "{name} is catching some air with a sutta.",
    "{name} popped out for a smoke.",
    "A short sutta break for {name}.",
    "{name} is having a smoke right now.",
];

const SUTTA_SOS: &[&str] = &[
    "{name} is slipping again and could use you.",
    "Another sutta for {name} today. Check in?",
    "{name} is having a hard time. Reach out?",
    "SOS: {name} needs some support.",
    "{name} is struggling right now.",
    "Heads up: {name} went back for another smoke.",
    "{name} could really use a message from you.",
    "Time to check on {name}.",
    "{name} is sending an SOS.",
    "{name} needs you right now.",
];

const MOOD: &[&str] = &[
    "{name} is feeling {mood}.",
    "{name}'s mood right now: {mood}.",
    "{name} checked in as {mood}.",
    "Mood update: {name} is {mood}.",
    "{name} says they're {mood} at the moment.",
    "{name} is in a {mood} mood.",
    "Quick check-in from {name}: {mood}.",
    "{name} updated their mood to {mood}.",
    "FYI, {name} is feeling {mood} today.",
    "{name} shared a mood: {mood}.",
];

const MOOD_PROMPT: &[&str] = &[
    "How are you feeling right now?",
    "Time for a quick mood check-in.",
    "Let your partner know how you're doing.",
    "What's your mood today?",
    "Take a second to share your mood.",
    "Your partner would love a mood update.",
    "How's the day treating you?",
    "Check in with a mood.",
    "One tap: how are you feeling?",
    "Share how today is going.",
];

const GOSSIP: &[&str] = &[
    "{name} has fresh gossip for you.",
    "New gossip from {name}.",
    "{name} has something to tell you.",
    "Psst, {name} left you some tea.",
    "{name} just dropped some gossip.",
    "There's news from {name}.",
    "{name} shared a secret.",
    "Gossip alert from {name}.",
    "{name} has the scoop.",
    "{name} wants to tell you something.",
];

const GOSSIP_REACTION: &[&str] = &[
    "{name} reacted to your gossip.",
    "{name} read your gossip.",
    "Your gossip landed with {name}.",
    "{name} caught up on your gossip.",
    "{name} just reacted to your tea.",
    "Your secret reached {name}.",
    "{name} saw what you shared.",
    "{name} is in on it now.",
    "Gossip received by {name}.",
    "{name} took in your news.",
];

const NOTICE_SEEN: &[&str] = &[
    "{name} saw your notice.",
    "{name} read your notice.",
    "Your notice reached {name}.",
    "{name} just checked the notice board.",
    "Notice seen by {name}.",
    "{name} caught your latest notice.",
    "{name} is up to date with your notice.",
    "Your notice has been read by {name}.",
    "{name} looked at your notice.",
    "{name} got your message on the board.",
];

const FRUSTRATION_PROJECT: &[&str] = &[
    "{name} is done with this project.",
    "{name} wants to walk away from the project.",
    "This project is getting to {name}.",
    "{name} is close to rage-quitting the project.",
    "The project is testing {name} today.",
    "{name} has had it with this project.",
    "{name} is fighting the project again.",
    "{name} needs a break from the project.",
    "{name} is one bug from giving up on the project.",
    "Project frustration levels are high for {name}.",
];

const FRUSTRATION_JUNIOR: &[&str] = &[
    "{name}'s junior is testing their patience.",
    "{name} is fed up with their junior.",
    "{name}'s junior is making today hard.",
    "{name} needs a break from their junior.",
    "{name} is out of patience with their junior.",
    "The junior is at it again, says {name}.",
    "{name} is struggling with their junior today.",
    "{name}'s junior pushed the wrong buttons.",
    "{name} could use some sympathy about their junior.",
    "{name} is counting the minutes until their junior logs off.",
];

const FRUSTRATION_RESIGN: &[&str] = &[
    "{name} is thinking about resigning.",
    "{name} is one meeting away from quitting.",
    "{name} is drafting a resignation letter in their head.",
    "{name} wants to walk out today.",
    "{name} is browsing job listings.",
    "{name} has had enough of this job.",
    "{name} is seriously considering quitting.",
    "{name} is updating their CV.",
    "{name} is done with work for good, apparently.",
    "{name} is dreaming of handing in their notice.",
];

const FRUSTRATION_OTHER: &[&str] = &["{name} is frustrated right now."];

const VENT_FALLBACK: &[&str] = &["{name} needs to vent!"];

/// Rendered notification text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedNotification {
    /// Title line.
    pub title: String,
    /// Body text.
    pub body: String,
}

/// Title for `kind`.
#[must_use]
pub const fn title_for(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::SuttaSos => "Partner SOS!",
        NotificationKind::Vent => "Partner Vent",
        NotificationKind::MoodPrompt => "Mood check",
        _ => DEFAULT_TITLE,
    }
}

fn templates(event: &NotificationEvent) -> &'static [&'static str] {
    match event {
        NotificationEvent::Sutta { sos: false, .. } => SUTTA_NORMAL,
        NotificationEvent::Sutta { sos: true, .. } => SUTTA_SOS,
        NotificationEvent::Mood { .. } => MOOD,
        NotificationEvent::MoodPrompt => MOOD_PROMPT,
        NotificationEvent::Gossip { .. } => GOSSIP,
        NotificationEvent::GossipReaction { .. } => GOSSIP_REACTION,
        NotificationEvent::NoticeSeen { .. } => NOTICE_SEEN,
        NotificationEvent::Frustration { kind, .. } => match kind {
            ActionKind::Project => FRUSTRATION_PROJECT,
            ActionKind::Junior => FRUSTRATION_JUNIOR,
            ActionKind::Resign => FRUSTRATION_RESIGN,
            ActionKind::Sutta => FRUSTRATION_OTHER,
        },
        NotificationEvent::Vent { .. } => VENT_FALLBACK,
    }
}

fn render(template: &str, event: &NotificationEvent) -> String {
    let text = template.replace("{name}", event.sender_name());
    match event {
        NotificationEvent::Mood { mood, .. } => text.replace("{mood}", mood.as_str()),
        _ => text,
    }
}

/// Every body `compose` may return for `event`.
///
/// # Examples
/// ```
/// use pairspace::domain::notification::{NotificationEvent, candidates};
///
/// let event = NotificationEvent::Gossip { name: "Bob".to_owned() };
/// assert!(candidates(&event).iter().all(|body| body.contains("Bob")));
/// ```
#[must_use]
pub fn candidates(event: &NotificationEvent) -> Vec<String> {
    if let NotificationEvent::Vent { text, .. } = event {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            return vec![trimmed.to_owned()];
        }
    }
    templates(event)
        .iter()
        .map(|template| render(template, event))
        .collect()
}

/// Pick a title and body for `event` using `rng`.
pub fn compose<R: Rng + ?Sized>(event: &NotificationEvent, rng: &mut R) -> ComposedNotification {
    let options = candidates(event);
    let body = options
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| format!("{} has an update.", event.sender_name()));
    ComposedNotification {
        title: title_for(event.kind()).to_owned(),
        body,
    }
}

/// Shared, thread-safe composer owning its RNG.
#[derive(Debug)]
pub struct NotificationComposer {
    rng: Mutex<SmallRng>,
}

impl NotificationComposer {
    /// Composer with a fixed seed; equal seeds give equal text sequences.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    /// Composer seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    /// Compose text for `event`.
    pub fn compose(&self, event: &NotificationEvent) -> ComposedNotification {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        compose(event, &mut *rng)
    }
}

impl Default for NotificationComposer {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mood;
    use rstest::rstest;

    fn bob(kind: NotificationKind) -> NotificationEvent {
        let name = "Bob".to_owned();
        match kind {
            NotificationKind::SuttaNormal => NotificationEvent::Sutta { name, sos: false },
            NotificationKind::SuttaSos => NotificationEvent::Sutta { name, sos: true },
            NotificationKind::Mood => NotificationEvent::Mood {
                name,
                mood: Mood::Calm,
            },
            NotificationKind::MoodPrompt => NotificationEvent::MoodPrompt,
            NotificationKind::Gossip => NotificationEvent::Gossip { name },
            NotificationKind::GossipReaction => NotificationEvent::GossipReaction { name },
            NotificationKind::Frustration => NotificationEvent::Frustration {
                name,
                kind: ActionKind::Resign,
            },
            NotificationKind::NoticeSeen => NotificationEvent::NoticeSeen { name },
            NotificationKind::Vent => NotificationEvent::Vent {
                name,
                text: "ugh, deadlines".to_owned(),
            },
        }
    }

    #[rstest]
    #[case(NotificationKind::SuttaSos, "Partner SOS!")]
    #[case(NotificationKind::Vent, "Partner Vent")]
    #[case(NotificationKind::MoodPrompt, "Mood check")]
    #[case(NotificationKind::Gossip, "Space")]
    #[case(NotificationKind::NoticeSeen, "Space")]
    fn titles_follow_kind(#[case] kind: NotificationKind, #[case] title: &str) {
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(compose(&bob(kind), &mut rng).title, title);
    }

    #[rstest]
    fn every_kind_composes_a_candidate_body() {
        let mut rng = SmallRng::seed_from_u64(11);
        for kind in NotificationKind::ALL {
            let event = bob(kind);
            let composed = compose(&event, &mut rng);
            assert!(
                candidates(&event).contains(&composed.body),
                "{kind}: unexpected body {}",
                composed.body
            );
        }
    }

    #[rstest]
    fn placeholders_are_filled() {
        let event = bob(NotificationKind::Mood);
        for body in candidates(&event) {
            assert!(body.contains("Bob"), "{body}");
            assert!(body.contains("Calm"), "{body}");
            assert!(!body.contains('{'), "{body}");
        }
    }

    #[rstest]
    fn vent_body_is_the_vent_text() {
        let mut rng = SmallRng::seed_from_u64(1);
        let composed = compose(&bob(NotificationKind::Vent), &mut rng);
        assert_eq!(composed.body, "ugh, deadlines");
    }

    #[rstest]
    fn blank_vent_falls_back_to_template() {
        let event = NotificationEvent::Vent {
            name: "Bob".to_owned(),
            text: "   ".to_owned(),
        };
        assert_eq!(candidates(&event), vec!["Bob needs to vent!".to_owned()]);
    }

    #[rstest]
    fn equal_seeds_give_equal_sequences() {
        let left = NotificationComposer::seeded(42);
        let right = NotificationComposer::seeded(42);
        let event = bob(NotificationKind::Gossip);
        for _ in 0..5 {
            assert_eq!(left.compose(&event), right.compose(&event));
        }
    }
}
