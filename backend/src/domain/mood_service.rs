//! Mood check-in service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::pair_access::resolve_membership;
use crate::domain::ports::{
    MoodCommand, MoodQuery, MoodRepository, MoodRepositoryError, NotificationSink, PairDirectory,
    submit_detached,
};
use crate::domain::{
    DispatchRequest, Error, Mood, MoodEntry, NotificationEvent, PairActor, mood_freshness,
};

fn map_mood_error(error: MoodRepositoryError) -> Error {
    match error {
        MoodRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("mood repository unavailable: {message}"))
        }
        MoodRepositoryError::Query { message } => {
            Error::internal(format!("mood repository error: {message}"))
        }
    }
}

/// Service behind mood check-ins.
#[derive(Clone)]
pub struct MoodService {
    directory: Arc<dyn PairDirectory>,
    moods: Arc<dyn MoodRepository>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl MoodService {
    /// Create the service.
    pub fn new(
        directory: Arc<dyn PairDirectory>,
        moods: Arc<dyn MoodRepository>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            directory,
            moods,
            sink,
            clock,
        }
    }
}

#[async_trait]
impl MoodCommand for MoodService {
    async fn record(&self, actor: PairActor, mood: Mood) -> Result<MoodEntry, Error> {
        let membership = resolve_membership(self.directory.as_ref(), &actor).await?;
        let entry = MoodEntry {
            pair_id: membership.pair_id,
            user_id: membership.member.id,
            mood,
            created_at: self.clock.utc(),
        };
        self.moods.insert(&entry).await.map_err(map_mood_error)?;
        submit_detached(
            self.sink.as_ref(),
            DispatchRequest::new(
                membership.partner.id,
                membership.pair_id,
                NotificationEvent::Mood {
                    name: membership.member.display_name,
                    mood,
                },
            ),
        );
        Ok(entry)
    }
}

#[async_trait]
impl MoodQuery for MoodService {
    async fn partner_mood(&self, actor: PairActor) -> Result<Option<MoodEntry>, Error> {
        let membership = resolve_membership(self.directory.as_ref(), &actor).await?;
        let since = self.clock.utc() - mood_freshness();
        self.moods
            .latest_since(&membership.pair_id, &membership.partner.id, since)
            .await
            .map_err(map_mood_error)
    }
}
