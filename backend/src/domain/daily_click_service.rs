//! Daily button service.
//!
//! Implements [`DailyClickCommand`] and [`DailyClickQuery`] over the action
//! ledger. Each accepted press appends exactly one ledger record and queues
//! exactly one notification for the partner.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;

use crate::domain::pair_access::resolve_membership;
use crate::domain::ports::{
    ClickOutcome, ClickStatus, DailyClickCommand, DailyClickQuery, DailyClickRequest,
    LedgerRepository, LedgerRepositoryError, NotificationSink, PairDirectory, submit_detached,
};
use crate::domain::{
    ActionKind, DispatchRequest, Error, InteractionRejection, LedgerAppend, LedgerPolicy,
    NotificationEvent, PairActor, SuttaTier, VentText, WindowSummary, minutes_until_available,
};

fn parse_vent(raw: Option<&str>) -> Result<Option<VentText>, Error> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    VentText::parse(raw).map_err(|error| {
        Error::invalid_request(format!("ventText: {error}")).with_details(json!({
            "field": "ventText",
            "code": "content_too_long",
        }))
    })
}

fn map_ledger_error(error: LedgerRepositoryError) -> Error {
    match error {
        LedgerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ledger repository unavailable: {message}"))
        }
        LedgerRepositoryError::Query { message } => {
            Error::internal(format!("ledger repository error: {message}"))
        }
    }
}

/// Service behind the sutta and frustration buttons.
#[derive(Clone)]
pub struct DailyClickService {
    directory: Arc<dyn PairDirectory>,
    ledger: Arc<dyn LedgerRepository>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    policy: LedgerPolicy,
}

impl DailyClickService {
    /// Create the service.
    pub fn new(
        directory: Arc<dyn PairDirectory>,
        ledger: Arc<dyn LedgerRepository>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        policy: LedgerPolicy,
    ) -> Self {
        Self {
            directory,
            ledger,
            sink,
            clock,
            policy,
        }
    }
}

fn event_for(
    kind: ActionKind,
    name: String,
    prior_count: u32,
    vent: Option<VentText>,
) -> (NotificationEvent, Option<bool>) {
    if kind == ActionKind::Sutta {
        let sos = SuttaTier::for_prior_count(prior_count) == SuttaTier::Sos;
        return (NotificationEvent::Sutta { name, sos }, Some(sos));
    }
    match vent {
        Some(text) => (
            NotificationEvent::Vent {
                name,
                text: text.into(),
            },
            None,
        ),
        None => (NotificationEvent::Frustration { name, kind }, None),
    }
}

#[async_trait]
impl DailyClickCommand for DailyClickService {
    async fn click(&self, request: DailyClickRequest) -> Result<ClickOutcome, Error> {
        let vent = parse_vent(request.vent_text.as_deref())?;
        let membership = resolve_membership(self.directory.as_ref(), &request.actor).await?;
        let now = self.clock.utc();
        let policy = self.policy.for_kind(request.kind);
        let append = LedgerAppend {
            pair_id: membership.pair_id,
            actor_id: membership.member.id,
            kind: request.kind,
            occurred_at: now,
            window_start: policy.window.start(now),
            cap: policy.cap,
        };
        let outcome = self
            .ledger
            .append_if_allowed(&append)
            .await
            .map_err(map_ledger_error)?;

        if !outcome.accepted {
            let summary = WindowSummary {
                count: outcome.prior_count,
                oldest: outcome.oldest_in_window,
            };
            let remaining_minutes = minutes_until_available(policy, summary, now).unwrap_or(0);
            return Err(InteractionRejection::DailyLimitReached {
                remaining_minutes,
                click_count: outcome.prior_count,
            }
            .into());
        }

        let (event, is_sos) = event_for(
            request.kind,
            membership.member.display_name.clone(),
            outcome.prior_count,
            vent,
        );
        submit_detached(
            self.sink.as_ref(),
            DispatchRequest::new(membership.partner.id, membership.pair_id, event),
        );

        Ok(ClickOutcome {
            is_sos,
            click_count: outcome.prior_count.saturating_add(1),
        })
    }
}

#[async_trait]
impl DailyClickQuery for DailyClickService {
    async fn status(&self, actor: PairActor, kind: ActionKind) -> Result<ClickStatus, Error> {
        let membership = resolve_membership(self.directory.as_ref(), &actor).await?;
        let now = self.clock.utc();
        let policy = self.policy.for_kind(kind);
        let summary = self
            .ledger
            .window_summary(
                &membership.pair_id,
                &membership.member.id,
                kind,
                policy.window.start(now),
            )
            .await
            .map_err(map_ledger_error)?;
        let remaining_minutes = minutes_until_available(policy, summary, now);
        Ok(ClickStatus {
            kind,
            count_today: summary.count,
            can_click: remaining_minutes.is_none(),
            remaining_minutes,
        })
    }
}

#[cfg(test)]
#[path = "daily_click_service_tests.rs"]
mod tests;
