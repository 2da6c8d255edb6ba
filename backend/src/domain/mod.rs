//! Domain primitives, rules, and services.
//!
//! Purpose: Define strongly typed domain entities and the turn-taking and
//! rate-limiting rules that govern a pair's interactions. Rules are pure
//! functions over loaded state; services combine them with the ports.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - InteractionRejection: typed refusal reasons carried by errors.
//! - NoticeRules, ActionKind/LedgerPolicy, GossipMessage, Mood: the rules.
//! - *Service: implementations of the driving ports in [`ports`].

pub mod content;
pub mod error;
pub mod gossip;
pub mod identity;
pub mod ledger;
pub mod mood;
pub mod notice;
pub mod notification;
pub mod pairing;
pub mod ports;
pub mod rejection;
pub mod trace_id;

mod daily_click_service;
mod gossip_service;
mod mood_prompt_service;
mod mood_service;
mod notice_service;
mod notification_inbox_service;
mod pair_access;
mod subscription_service;

#[cfg(test)]
mod test_fixtures;

pub use self::content::{
    ContentError, MAX_CONTENT_CHARS, MAX_VENT_CHARS, MessageContent, VentText,
};
pub use self::daily_click_service::DailyClickService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::gossip::GossipMessage;
pub use self::gossip_service::GossipService;
pub use self::identity::{
    GossipId, IdentifierError, NoticeId, NotificationId, PairId, SubscriptionId, UserId,
};
pub use self::ledger::{
    ActionKind, ActionWindow, KindPolicy, LedgerAppend, LedgerAppendOutcome, LedgerPolicy,
    SuttaTier, UnknownActionKind, UnknownActionWindow, WindowSummary, has_capacity,
    minutes_until_available,
};
pub use self::mood::{Mood, MoodEntry, UnknownMood, mood_freshness};
pub use self::mood_prompt_service::MoodPromptService;
pub use self::mood_service::MoodService;
pub use self::notice::{
    DEFAULT_NOTICE_COOLDOWN_MINUTES, Notice, NoticeRules, NoticeTurnState, SeenTransition,
    evaluate_mark_seen,
};
pub use self::notice_service::NoticeService;
pub use self::notification::{
    BackgroundDispatcher, ComposedNotification, DispatchReport, DispatchRequest,
    NotificationComposer, NotificationDispatcher, NotificationEvent, NotificationKind,
    NotificationPayload, NotificationQueueEntry, PushMessage, PushSubscription, SYSTEM_SENDER,
    SubscriptionDescriptor, SubscriptionDescriptorError, SubscriptionKeys,
    UnknownNotificationKind,
};
pub use self::notification_inbox_service::NotificationInboxService;
pub use self::pairing::{Member, PairActor, PairMembership, PairedUser};
pub use self::rejection::{InteractionRejection, minutes_rounded_up};
pub use self::subscription_service::SubscriptionService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use pairspace::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("not your pair"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
