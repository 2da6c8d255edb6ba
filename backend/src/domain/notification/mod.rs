//! Notification events, history entries, and push subscriptions.
//!
//! A [`NotificationEvent`] describes something that happened to the
//! recipient's partner. The [`composer`] turns it into title and body text,
//! the [`dispatcher`] records it and attempts push delivery, and the
//! [`worker`] runs dispatch off the request path.

pub mod composer;
pub mod dispatcher;
pub mod worker;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{ActionKind, Mood, NotificationId, PairId, SubscriptionId, TraceId, UserId};

pub use composer::{ComposedNotification, NotificationComposer, candidates, compose};
pub use dispatcher::{DispatchReport, NotificationDispatcher};
pub use worker::BackgroundDispatcher;

/// Notification categories stored in history and used for text selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// First sutta click in the window.
    SuttaNormal,
    /// Repeat sutta click in the window.
    SuttaSos,
    /// Partner recorded a mood.
    Mood,
    /// Scheduled nudge to record a mood.
    MoodPrompt,
    /// Partner posted gossip.
    Gossip,
    /// Partner acknowledged the recipient's gossip.
    GossipReaction,
    /// Partner pressed a frustration button.
    Frustration,
    /// Partner saw the recipient's notice.
    NoticeSeen,
    /// Partner vented with free text.
    Vent,
}

/// Raised when stored text names no known kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown notification kind: {0}")]
pub struct UnknownNotificationKind(pub String);

impl NotificationKind {
    /// Every kind.
    pub const ALL: [Self; 9] = [
        Self::SuttaNormal,
        Self::SuttaSos,
        Self::Mood,
        Self::MoodPrompt,
        Self::Gossip,
        Self::GossipReaction,
        Self::Frustration,
        Self::NoticeSeen,
        Self::Vent,
    ];

    /// Storage and wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuttaNormal => "sutta_normal",
            Self::SuttaSos => "sutta_sos",
            Self::Mood => "mood",
            Self::MoodPrompt => "mood_prompt",
            Self::Gossip => "gossip",
            Self::GossipReaction => "gossip_reaction",
            Self::Frustration => "frustration",
            Self::NoticeSeen => "notice_seen",
            Self::Vent => "vent",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = UnknownNotificationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownNotificationKind(s.to_owned()))
    }
}

/// Name shown for system-originated notifications.
pub const SYSTEM_SENDER: &str = "System";

/// Something the recipient should hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    /// A sutta click; `sos` marks a repeat within the window.
    Sutta {
        /// Partner display name.
        name: String,
        /// Whether this is an escalated repeat.
        sos: bool,
    },
    /// A mood update.
    Mood {
        /// Partner display name.
        name: String,
        /// Reported mood.
        mood: Mood,
    },
    /// Scheduled mood check-in prompt.
    MoodPrompt,
    /// New gossip.
    Gossip {
        /// Partner display name.
        name: String,
    },
    /// The recipient's gossip was acknowledged.
    GossipReaction {
        /// Partner display name.
        name: String,
    },
    /// A frustration button press.
    Frustration {
        /// Partner display name.
        name: String,
        /// Which frustration button.
        kind: ActionKind,
    },
    /// The recipient's notice was seen.
    NoticeSeen {
        /// Partner display name.
        name: String,
    },
    /// A frustration press carrying free text.
    Vent {
        /// Partner display name.
        name: String,
        /// The vent text.
        text: String,
    },
}

impl NotificationEvent {
    /// Category of this event.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        match self {
            Self::Sutta { sos: false, .. } => NotificationKind::SuttaNormal,
            Self::Sutta { sos: true, .. } => NotificationKind::SuttaSos,
            Self::Mood { .. } => NotificationKind::Mood,
            Self::MoodPrompt => NotificationKind::MoodPrompt,
            Self::Gossip { .. } => NotificationKind::Gossip,
            Self::GossipReaction { .. } => NotificationKind::GossipReaction,
            Self::Frustration { .. } => NotificationKind::Frustration,
            Self::NoticeSeen { .. } => NotificationKind::NoticeSeen,
            Self::Vent { .. } => NotificationKind::Vent,
        }
    }

    /// Name of whoever caused the event.
    #[must_use]
    pub fn sender_name(&self) -> &str {
        match self {
            Self::Sutta { name, .. }
            | Self::Mood { name, .. }
            | Self::Gossip { name }
            | Self::GossipReaction { name }
            | Self::Frustration { name, .. }
            | Self::NoticeSeen { name }
            | Self::Vent { name, .. } => name,
            Self::MoodPrompt => SYSTEM_SENDER,
        }
    }

    /// Structured payload stored alongside the history entry.
    #[must_use]
    pub fn payload(&self) -> NotificationPayload {
        let mut payload = NotificationPayload {
            name: self.sender_name().to_owned(),
            mood: None,
            frustration: None,
            vent_text: None,
        };
        match self {
            Self::Mood { mood, .. } => payload.mood = Some(*mood),
            Self::Frustration { kind, .. } => payload.frustration = Some(*kind),
            Self::Vent { text, .. } => payload.vent_text = Some(text.clone()),
            _ => {}
        }
        payload
    }
}

/// JSON payload kept with each history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    /// Sender display name.
    pub name: String,
    /// Mood, for mood notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    /// Frustration button, for frustration notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frustration: Option<ActionKind>,
    /// Vent text, for vent notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vent_text: Option<String>,
}

/// Durable in-app notification history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQueueEntry {
    /// Entry identity.
    pub id: NotificationId,
    /// Recipient.
    pub recipient_id: UserId,
    /// Pair the event happened in.
    pub pair_id: PairId,
    /// Category.
    pub kind: NotificationKind,
    /// Structured payload.
    pub payload: NotificationPayload,
    /// Whether the recipient acknowledged it.
    pub read: bool,
    /// When it was recorded.
    pub created_at: DateTime<Utc>,
}

/// Browser-supplied encryption keys for a push endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    /// Client public key, URL-safe base64.
    pub p256dh: String,
    /// Client auth secret, URL-safe base64.
    pub auth: String,
}

/// Validation failures for [`SubscriptionDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubscriptionDescriptorError {
    /// The endpoint is not an absolute http(s) URL.
    #[error("endpoint must be an absolute http(s) URL")]
    InvalidEndpoint,
    /// A key was blank.
    #[error("subscription keys must not be empty")]
    MissingKeys,
}

/// Push endpoint descriptor as produced by the browser push API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDescriptor {
    /// Push service URL.
    pub endpoint: String,
    /// Encryption keys.
    pub keys: SubscriptionKeys,
    /// Expiry advertised by the browser, in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<i64>,
}

impl SubscriptionDescriptor {
    /// Check the endpoint and keys.
    ///
    /// # Errors
    /// Returns [`SubscriptionDescriptorError`] when the endpoint is not an
    /// http(s) URL with a host or a key is blank.
    pub fn validate(&self) -> Result<(), SubscriptionDescriptorError> {
        let url = Url::parse(&self.endpoint)
            .map_err(|_| SubscriptionDescriptorError::InvalidEndpoint)?;
        if !matches!(url.scheme(), "https" | "http") || url.host_str().is_none() {
            return Err(SubscriptionDescriptorError::InvalidEndpoint);
        }
        if self.keys.p256dh.trim().is_empty() || self.keys.auth.trim().is_empty() {
            return Err(SubscriptionDescriptorError::MissingKeys);
        }
        Ok(())
    }

    /// Endpoint host, for logs.
    #[must_use]
    pub fn endpoint_host(&self) -> String {
        Url::parse(&self.endpoint)
            .ok()
            .and_then(|url| url.host_str().map(str::to_owned))
            .unwrap_or_else(|| "<invalid>".to_owned())
    }
}

/// A stored push registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    /// Registration identity.
    pub id: SubscriptionId,
    /// Owning user.
    pub user_id: UserId,
    /// Endpoint descriptor.
    pub descriptor: SubscriptionDescriptor,
    /// First registration time.
    pub created_at: DateTime<Utc>,
}

/// Payload delivered to each push endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Pair the click should open.
    pub pair_id: PairId,
}

/// A unit of work for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    /// Who is notified.
    pub recipient_id: UserId,
    /// Pair the event belongs to.
    pub pair_id: PairId,
    /// What happened.
    pub event: NotificationEvent,
    /// Trace id of the submitting request.
    pub trace_id: Option<TraceId>,
}

impl DispatchRequest {
    /// Build a request, capturing the trace id currently in scope.
    #[must_use]
    pub fn new(recipient_id: UserId, pair_id: PairId, event: NotificationEvent) -> Self {
        Self {
            recipient_id,
            pair_id,
            event,
            trace_id: TraceId::current(),
        }
    }
}
