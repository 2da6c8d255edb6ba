//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer. Conversions into domain
//! values live beside the repository that reads them.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    gossip_messages, ledger_actions, moods, notices, notification_queue, pairs, push_subscriptions,
    users,
};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
}

/// Row read from `pairs`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pairs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PairRow {
    pub id: Uuid,
    pub first_user_id: Uuid,
    pub second_user_id: Option<Uuid>,
}

/// Insertable ledger entry.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ledger_actions)]
pub(crate) struct NewLedgerActionRow<'a> {
    pub pair_id: Uuid,
    pub actor_id: Uuid,
    pub kind: &'a str,
    pub occurred_at: DateTime<Utc>,
}

/// Row read from and written to `notices`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NoticeRow {
    pub id: Uuid,
    pub pair_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub seen_at: Option<DateTime<Utc>>,
    pub is_edited: bool,
    pub editable_until: DateTime<Utc>,
}

/// Row read from and written to `gossip_messages`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = gossip_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GossipRow {
    pub id: Uuid,
    pub pair_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub seen: bool,
    pub acknowledged_at: Option<DateTime<Utc>>,
}

/// Row read from `moods`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = moods)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MoodRow {
    pub pair_id: Uuid,
    pub user_id: Uuid,
    pub mood: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable mood entry.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = moods)]
pub(crate) struct NewMoodRow<'a> {
    pub pair_id: Uuid,
    pub user_id: Uuid,
    pub mood: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row read from and written to `notification_queue`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notification_queue)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub pair_id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Row read from and written to `push_subscriptions`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = push_subscriptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PushSubscriptionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub endpoint: String,
    pub descriptor: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
