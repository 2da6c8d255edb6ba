//! Process-local adapters for every driven port.
//!
//! [`InMemoryStore`] keeps pairs and interaction records behind a single
//! mutex, so each port call is atomic with respect to every other. The server
//! falls back to it when no database is configured, and behaviour tests use it
//! to exercise services end to end. Nothing survives a restart.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    GossipRepository, GossipRepositoryError, LedgerRepository, LedgerRepositoryError,
    MoodRepository, MoodRepositoryError, NoticeRepository, NoticeRepositoryError,
    NotificationRepository, NotificationRepositoryError, PairDirectory, PairDirectoryError,
    SubscriptionRepository, SubscriptionRepositoryError,
};
use crate::domain::{
    ActionKind, GossipId, GossipMessage, LedgerAppend, LedgerAppendOutcome, Member,
    MessageContent, MoodEntry, Notice, NoticeId, NotificationId, NotificationQueueEntry, PairId,
    PairMembership, PairedUser, PushSubscription, SubscriptionDescriptor, SubscriptionId, UserId,
    WindowSummary,
};

#[derive(Debug, Clone)]
struct PairRecord {
    id: PairId,
    members: Vec<Member>,
}

#[derive(Debug, Clone)]
struct LedgerRecord {
    pair_id: PairId,
    actor_id: UserId,
    kind: ActionKind,
    occurred_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct StoreState {
    pairs: Vec<PairRecord>,
    ledger: Vec<LedgerRecord>,
    notices: Vec<Notice>,
    gossip: Vec<GossipMessage>,
    moods: Vec<MoodEntry>,
    notifications: Vec<NotificationQueueEntry>,
    subscriptions: Vec<PushSubscription>,
}

impl StoreState {
    fn window(
        &self,
        pair_id: &PairId,
        actor_id: &UserId,
        kind: ActionKind,
        since: DateTime<Utc>,
    ) -> WindowSummary {
        let in_window = self.ledger.iter().filter(|record| {
            record.pair_id == *pair_id
                && record.actor_id == *actor_id
                && record.kind == kind
                && record.occurred_at >= since
        });
        let (count, oldest) = in_window.fold((0_u32, None), |(count, oldest), record| {
            let oldest = match oldest {
                Some(current) if current <= record.occurred_at => Some(current),
                _ => Some(record.occurred_at),
            };
            (count.saturating_add(1), oldest)
        });
        WindowSummary { count, oldest }
    }
}

/// Shared in-process store implementing the persistence and directory ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a pair with its members. A pair with fewer than two members
    /// is treated as incomplete by the directory.
    pub fn add_pair(&self, pair_id: PairId, members: impl IntoIterator<Item = Member>) {
        let members = members.into_iter().collect();
        let mut state = self.lock();
        state.pairs.retain(|pair| pair.id != pair_id);
        state.pairs.push(PairRecord {
            id: pair_id,
            members,
        });
    }

    /// Every stored history entry, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<NotificationQueueEntry> {
        self.lock().notifications.clone()
    }
}

#[async_trait]
impl PairDirectory for InMemoryStore {
    async fn membership(
        &self,
        pair_id: &PairId,
        user_id: &UserId,
    ) -> Result<PairMembership, PairDirectoryError> {
        let state = self.lock();
        let pair = state
            .pairs
            .iter()
            .find(|pair| pair.id == *pair_id)
            .ok_or_else(PairDirectoryError::pair_not_found)?;
        let [first, second] = pair.members.as_slice() else {
            return Err(PairDirectoryError::pair_incomplete());
        };
        let (member, partner) = if first.id == *user_id {
            (first, second)
        } else if second.id == *user_id {
            (second, first)
        } else {
            return Err(PairDirectoryError::not_member());
        };
        Ok(PairMembership {
            pair_id: *pair_id,
            member: member.clone(),
            partner: partner.clone(),
        })
    }

    async fn paired_users(&self) -> Result<Vec<PairedUser>, PairDirectoryError> {
        let state = self.lock();
        let mut users: Vec<PairedUser> = Vec::new();
        for pair in state.pairs.iter().filter(|pair| pair.members.len() == 2) {
            for member in &pair.members {
                if users.iter().all(|user| user.user_id != member.id) {
                    users.push(PairedUser {
                        user_id: member.id,
                        pair_id: pair.id,
                    });
                }
            }
        }
        Ok(users)
    }
}

#[async_trait]
impl LedgerRepository for InMemoryStore {
    async fn append_if_allowed(
        &self,
        append: &LedgerAppend,
    ) -> Result<LedgerAppendOutcome, LedgerRepositoryError> {
        let mut state = self.lock();
        let summary = state.window(
            &append.pair_id,
            &append.actor_id,
            append.kind,
            append.window_start,
        );
        let accepted = append.cap.is_none_or(|cap| summary.count < cap);
        if accepted {
            state.ledger.push(LedgerRecord {
                pair_id: append.pair_id,
                actor_id: append.actor_id,
                kind: append.kind,
                occurred_at: append.occurred_at,
            });
        }
        Ok(LedgerAppendOutcome {
            accepted,
            prior_count: summary.count,
            oldest_in_window: summary.oldest,
        })
    }

    async fn window_summary(
        &self,
        pair_id: &PairId,
        actor_id: &UserId,
        kind: ActionKind,
        since: DateTime<Utc>,
    ) -> Result<WindowSummary, LedgerRepositoryError> {
        Ok(self.lock().window(pair_id, actor_id, kind, since))
    }
}

fn latest_notice<'a>(notices: &'a [Notice], pair_id: &PairId) -> Option<&'a Notice> {
    notices.iter().rev().find(|notice| notice.pair_id == *pair_id)
}

#[async_trait]
impl NoticeRepository for InMemoryStore {
    async fn latest_for_pair(
        &self,
        pair_id: &PairId,
    ) -> Result<Option<Notice>, NoticeRepositoryError> {
        Ok(latest_notice(&self.lock().notices, pair_id).cloned())
    }

    async fn insert_if_latest(
        &self,
        notice: &Notice,
        expected_latest: Option<NoticeId>,
    ) -> Result<bool, NoticeRepositoryError> {
        let mut state = self.lock();
        let current = latest_notice(&state.notices, &notice.pair_id).map(|latest| latest.id);
        if current != expected_latest {
            return Ok(false);
        }
        state.notices.push(notice.clone());
        Ok(true)
    }

    async fn apply_edit(
        &self,
        notice_id: &NoticeId,
        content: &MessageContent,
        now: DateTime<Utc>,
    ) -> Result<bool, NoticeRepositoryError> {
        let mut state = self.lock();
        let Some(notice) = state.notices.iter_mut().find(|notice| {
            notice.id == *notice_id && !notice.is_edited && notice.editable_until >= now
        }) else {
            return Ok(false);
        };
        notice.content = content.clone();
        notice.is_edited = true;
        Ok(true)
    }

    async fn mark_seen(
        &self,
        notice_id: &NoticeId,
        seen_at: DateTime<Utc>,
    ) -> Result<bool, NoticeRepositoryError> {
        let mut state = self.lock();
        let Some(notice) = state
            .notices
            .iter_mut()
            .find(|notice| notice.id == *notice_id && notice.seen_at.is_none())
        else {
            return Ok(false);
        };
        notice.seen_at = Some(seen_at);
        Ok(true)
    }
}

#[async_trait]
impl GossipRepository for InMemoryStore {
    async fn insert(&self, message: &GossipMessage) -> Result<(), GossipRepositoryError> {
        self.lock().gossip.push(message.clone());
        Ok(())
    }

    async fn take_active(
        &self,
        pair_id: &PairId,
        author_id: &UserId,
    ) -> Result<Vec<GossipMessage>, GossipRepositoryError> {
        let mut state = self.lock();
        let mut active: Vec<GossipMessage> = state
            .gossip
            .iter_mut()
            .filter(|message| {
                message.pair_id == *pair_id
                    && message.author_id == *author_id
                    && message.acknowledged_at.is_none()
            })
            .map(|message| {
                message.seen = true;
                message.clone()
            })
            .collect();
        active.sort_by_key(|message| message.created_at);
        Ok(active)
    }

    async fn find(
        &self,
        pair_id: &PairId,
        message_id: &GossipId,
    ) -> Result<Option<GossipMessage>, GossipRepositoryError> {
        Ok(self
            .lock()
            .gossip
            .iter()
            .find(|message| message.id == *message_id && message.pair_id == *pair_id)
            .cloned())
    }

    async fn acknowledge(
        &self,
        message_id: &GossipId,
        at: DateTime<Utc>,
    ) -> Result<bool, GossipRepositoryError> {
        let mut state = self.lock();
        let Some(message) = state
            .gossip
            .iter_mut()
            .find(|message| message.id == *message_id && message.acknowledged_at.is_none())
        else {
            return Ok(false);
        };
        message.acknowledged_at = Some(at);
        Ok(true)
    }
}

#[async_trait]
impl MoodRepository for InMemoryStore {
    async fn insert(&self, entry: &MoodEntry) -> Result<(), MoodRepositoryError> {
        self.lock().moods.push(entry.clone());
        Ok(())
    }

    async fn latest_since(
        &self,
        pair_id: &PairId,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Option<MoodEntry>, MoodRepositoryError> {
        Ok(self
            .lock()
            .moods
            .iter()
            .filter(|entry| {
                entry.pair_id == *pair_id && entry.user_id == *user_id && entry.created_at >= since
            })
            .max_by_key(|entry| entry.created_at)
            .cloned())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn append(
        &self,
        entry: &NotificationQueueEntry,
    ) -> Result<(), NotificationRepositoryError> {
        self.lock().notifications.push(entry.clone());
        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient_id: &UserId,
        unread_only: bool,
        limit: u32,
    ) -> Result<Vec<NotificationQueueEntry>, NotificationRepositoryError> {
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self
            .lock()
            .notifications
            .iter()
            .rev()
            .filter(|entry| entry.recipient_id == *recipient_id && !(unread_only && entry.read))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn mark_read(
        &self,
        recipient_id: &UserId,
        notification_id: &NotificationId,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut state = self.lock();
        let Some(entry) = state
            .notifications
            .iter_mut()
            .find(|entry| entry.id == *notification_id && entry.recipient_id == *recipient_id)
        else {
            return Ok(false);
        };
        entry.read = true;
        Ok(true)
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PushSubscription>, SubscriptionRepositoryError> {
        Ok(self
            .lock()
            .subscriptions
            .iter()
            .filter(|subscription| subscription.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn upsert(
        &self,
        user_id: &UserId,
        descriptor: &SubscriptionDescriptor,
        at: DateTime<Utc>,
    ) -> Result<PushSubscription, SubscriptionRepositoryError> {
        let mut state = self.lock();
        if let Some(existing) = state.subscriptions.iter_mut().find(|subscription| {
            subscription.user_id == *user_id && subscription.descriptor.endpoint == descriptor.endpoint
        }) {
            existing.descriptor = descriptor.clone();
            return Ok(existing.clone());
        }
        let subscription = PushSubscription {
            id: SubscriptionId::random(),
            user_id: *user_id,
            descriptor: descriptor.clone(),
            created_at: at,
        };
        state.subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn delete(&self, id: &SubscriptionId) -> Result<bool, SubscriptionRepositoryError> {
        let mut state = self.lock();
        let before = state.subscriptions.len();
        state.subscriptions.retain(|subscription| subscription.id != *id);
        Ok(state.subscriptions.len() < before)
    }

    async fn delete_by_endpoint(
        &self,
        user_id: &UserId,
        endpoint: &str,
    ) -> Result<u64, SubscriptionRepositoryError> {
        let mut state = self.lock();
        let before = state.subscriptions.len();
        state.subscriptions.retain(|subscription| {
            subscription.user_id != *user_id || subscription.descriptor.endpoint != endpoint
        });
        let removed = before.saturating_sub(state.subscriptions.len());
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}
