//! Notice board service.
//!
//! Turn rules are evaluated in the domain against the latest notice, then the
//! write is made conditional on that notice still being the latest. A lost
//! race re-reads and re-evaluates a bounded number of times before giving up
//! with `conflict`.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::pair_access::resolve_membership;
use crate::domain::ports::{
    NoticeBoardCommand, NoticeBoardQuery, NoticeRepository, NoticeRepositoryError, NoticeStatus,
    NotificationSink, PairDirectory, submit_detached,
};
use crate::domain::{
    DispatchRequest, Error, InteractionRejection, MessageContent, Notice, NoticeRules,
    NotificationEvent, PairActor, SeenTransition, evaluate_mark_seen,
};

/// Attempts made before a contended post gives up.
const MAX_POST_ATTEMPTS: usize = 3;

fn map_notice_error(error: NoticeRepositoryError) -> Error {
    match error {
        NoticeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notice repository unavailable: {message}"))
        }
        NoticeRepositoryError::Query { message } => {
            Error::internal(format!("notice repository error: {message}"))
        }
    }
}

/// Service behind the notice board.
#[derive(Clone)]
pub struct NoticeService {
    directory: Arc<dyn PairDirectory>,
    notices: Arc<dyn NoticeRepository>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    rules: NoticeRules,
}

impl NoticeService {
    /// Create the service.
    pub fn new(
        directory: Arc<dyn PairDirectory>,
        notices: Arc<dyn NoticeRepository>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        rules: NoticeRules,
    ) -> Self {
        Self {
            directory,
            notices,
            sink,
            clock,
            rules,
        }
    }

    async fn latest(&self, actor: &PairActor) -> Result<Option<Notice>, Error> {
        self.notices
            .latest_for_pair(&actor.pair_id)
            .await
            .map_err(map_notice_error)
    }
}

#[async_trait]
impl NoticeBoardCommand for NoticeService {
    async fn post(&self, actor: PairActor, content: MessageContent) -> Result<Notice, Error> {
        resolve_membership(self.directory.as_ref(), &actor).await?;
        for attempt in 1..=MAX_POST_ATTEMPTS {
            let latest = self.latest(&actor).await?;
            let now = self.clock.utc();
            self.rules
                .evaluate_post(latest.as_ref(), &actor.user_id, now)?;
            let notice = self
                .rules
                .draft(actor.pair_id, actor.user_id, content.clone(), now);
            let inserted = self
                .notices
                .insert_if_latest(&notice, latest.map(|previous| previous.id))
                .await
                .map_err(map_notice_error)?;
            if inserted {
                return Ok(notice);
            }
            debug!(pair_id = %actor.pair_id, attempt, "notice board changed during post; retrying");
        }
        Err(Error::conflict(
            "the notice board changed while posting; please try again",
        ))
    }

    async fn edit(&self, actor: PairActor, content: MessageContent) -> Result<Notice, Error> {
        resolve_membership(self.directory.as_ref(), &actor).await?;
        let latest = self.latest(&actor).await?;
        let now = self.clock.utc();
        let notice = self
            .rules
            .evaluate_edit(latest.as_ref(), &actor.user_id, now)?;
        let applied = self
            .notices
            .apply_edit(&notice.id, &content, now)
            .await
            .map_err(map_notice_error)?;
        if !applied {
            return Err(InteractionRejection::AlreadyEdited.into());
        }
        Ok(Notice {
            content,
            is_edited: true,
            ..notice.clone()
        })
    }

    async fn mark_seen(&self, actor: PairActor) -> Result<Notice, Error> {
        let membership = resolve_membership(self.directory.as_ref(), &actor).await?;
        let notice = self
            .latest(&actor)
            .await?
            .ok_or_else(|| Error::not_found("there is no notice to mark as seen"))?;

        match evaluate_mark_seen(&notice, &actor.user_id)? {
            SeenTransition::AlreadySeen => Ok(notice),
            SeenTransition::Apply => {
                let now = self.clock.utc();
                let applied = self
                    .notices
                    .mark_seen(&notice.id, now)
                    .await
                    .map_err(map_notice_error)?;
                if !applied {
                    return self
                        .latest(&actor)
                        .await?
                        .ok_or_else(|| Error::not_found("there is no notice to mark as seen"));
                }
                submit_detached(
                    self.sink.as_ref(),
                    DispatchRequest::new(
                        notice.author_id,
                        membership.pair_id,
                        NotificationEvent::NoticeSeen {
                            name: membership.member.display_name.clone(),
                        },
                    ),
                );
                Ok(Notice {
                    seen_at: Some(now),
                    ..notice
                })
            }
        }
    }
}

#[async_trait]
impl NoticeBoardQuery for NoticeService {
    async fn status(&self, actor: PairActor) -> Result<NoticeStatus, Error> {
        resolve_membership(self.directory.as_ref(), &actor).await?;
        let notice = self.latest(&actor).await?;
        let now = self.clock.utc();
        let state = self.rules.state(notice.as_ref(), now);
        let reason = self
            .rules
            .evaluate_post(notice.as_ref(), &actor.user_id, now)
            .err();
        Ok(NoticeStatus {
            notice,
            state,
            can_post: reason.is_none(),
            reason,
        })
    }
}

#[cfg(test)]
#[path = "notice_service_tests.rs"]
mod tests;
