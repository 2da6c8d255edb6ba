//! Scheduled job triggers.
//!
//! ```text
//! GET  /api/v1/cron/mood-prompt   Authorization: Bearer <secret>
//! POST /api/v1/cron/mood-prompt   Authorization: Bearer <secret>
//! ```
//!
//! Called by an external scheduler rather than a signed-in user, so these
//! routes authenticate with a shared bearer secret instead of the session.
//! Hosted schedulers typically issue `GET`; both methods run the same job.

use actix_web::{HttpRequest, get, http::header, post, web};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::MoodPromptReport;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Outcome of a prompt run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoodPromptResponseBody {
    /// Always `true` when the run completed.
    pub success: bool,
    /// Prompts queued for delivery.
    pub sent: u32,
    /// Prompts that could not be queued.
    pub failed: u32,
    /// Paired users considered.
    pub total: u32,
}

impl From<MoodPromptReport> for MoodPromptResponseBody {
    fn from(value: MoodPromptReport) -> Self {
        Self {
            success: true,
            sent: value.sent,
            failed: value.failed,
            total: value.total,
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

fn authorize(state: &HttpState, req: &HttpRequest) -> Result<(), Error> {
    let Some(secret) = state.cron_secret.as_ref() else {
        warn!("cron trigger refused: no secret configured");
        return Err(Error::unauthorized("cron trigger is disabled"));
    };
    match bearer_token(req) {
        Some(token) if secret.matches(token) => Ok(()),
        _ => Err(Error::unauthorized("invalid cron credentials")),
    }
}

async fn run_mood_prompt(
    state: &HttpState,
    req: &HttpRequest,
) -> ApiResult<MoodPromptResponseBody> {
    authorize(state, req)?;
    let report = state.mood_prompt.prompt_all().await?;
    info!(
        sent = report.sent,
        failed = report.failed,
        total = report.total,
        "mood prompt run finished"
    );
    Ok(MoodPromptResponseBody::from(report))
}

/// Ask every paired user to record a mood.
#[utoipa::path(
    post,
    path = "/api/v1/cron/mood-prompt",
    responses(
        (status = 200, description = "Prompts queued", body = MoodPromptResponseBody),
        (status = 401, description = "Missing or wrong bearer secret", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["cron"],
    operation_id = "cronMoodPrompt",
    security(("CronBearer" = []))
)]
#[post("/cron/mood-prompt")]
pub async fn mood_prompt(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<web::Json<MoodPromptResponseBody>> {
    run_mood_prompt(&state, &req).await.map(web::Json)
}

/// `GET` form of [`mood_prompt`] for schedulers that only issue `GET`.
#[utoipa::path(
    get,
    path = "/api/v1/cron/mood-prompt",
    responses(
        (status = 200, description = "Prompts queued", body = MoodPromptResponseBody),
        (status = 401, description = "Missing or wrong bearer secret", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["cron"],
    operation_id = "cronMoodPromptGet",
    security(("CronBearer" = []))
)]
#[get("/cron/mood-prompt")]
pub async fn mood_prompt_get(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<web::Json<MoodPromptResponseBody>> {
    run_mood_prompt(&state, &req).await.map(web::Json)
}
