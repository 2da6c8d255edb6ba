//! Scheduled mood prompt.
//!
//! Queues one prompt per paired user. Delivery happens in the background
//! dispatcher, so `sent` counts prompts handed off, not pushes delivered.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::pair_access::map_directory_error;
use crate::domain::ports::{MoodPromptCommand, MoodPromptReport, NotificationSink, PairDirectory};
use crate::domain::{DispatchRequest, Error, NotificationEvent};

/// Fans the daily mood prompt out to every paired user.
#[derive(Clone)]
pub struct MoodPromptService {
    directory: Arc<dyn PairDirectory>,
    sink: Arc<dyn NotificationSink>,
}

impl MoodPromptService {
    /// Create the service.
    pub fn new(directory: Arc<dyn PairDirectory>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { directory, sink }
    }
}

#[async_trait]
impl MoodPromptCommand for MoodPromptService {
    async fn prompt_all(&self) -> Result<MoodPromptReport, Error> {
        let users = self
            .directory
            .paired_users()
            .await
            .map_err(map_directory_error)?;

        let mut report = MoodPromptReport {
            total: u32::try_from(users.len()).unwrap_or(u32::MAX),
            ..MoodPromptReport::default()
        };
        for user in users {
            let request = DispatchRequest::new(
                user.user_id,
                user.pair_id,
                NotificationEvent::MoodPrompt,
            );
            match self.sink.submit(request) {
                Ok(()) => report.sent = report.sent.saturating_add(1),
                Err(error) => {
                    warn!(user_id = %user.user_id, error = %error, "mood prompt not queued");
                    report.failed = report.failed.saturating_add(1);
                }
            }
        }
        info!(
            sent = report.sent,
            failed = report.failed,
            total = report.total,
            "mood prompts queued"
        );
        Ok(report)
    }
}
