//! Notice board HTTP handlers.
//!
//! ```text
//! GET  /api/v1/pairs/{pair_id}/notice
//! POST /api/v1/pairs/{pair_id}/notice
//! PUT  /api/v1/pairs/{pair_id}/notice
//! POST /api/v1/pairs/{pair_id}/notice/seen
//! ```

use actix_web::{get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Notice;
use crate::domain::ports::NoticeStatus;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_content};

/// Request payload for posting or editing a notice.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoticeContentBody {
    /// Notice text. `message` is accepted as an alias.
    #[serde(alias = "message")]
    pub content: Option<String>,
}

/// Notice as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoticeBody {
    /// Notice identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Owning pair.
    #[schema(format = "uuid")]
    pub pair_id: String,
    /// Posting member.
    #[schema(format = "uuid")]
    pub author_id: String,
    /// Current text.
    pub content: String,
    /// When the notice was posted.
    #[schema(format = "date-time")]
    pub created_at: String,
    /// When the partner acknowledged it, or `null`.
    #[schema(format = "date-time")]
    pub seen_at: Option<String>,
    /// Whether the single edit has been used.
    pub is_edited: bool,
    /// Deadline for the single edit.
    #[schema(format = "date-time")]
    pub editable_until: String,
}

impl From<Notice> for NoticeBody {
    fn from(value: Notice) -> Self {
        Self {
            id: value.id.to_string(),
            pair_id: value.pair_id.to_string(),
            author_id: value.author_id.to_string(),
            content: value.content.as_str().to_owned(),
            created_at: value.created_at.to_rfc3339(),
            seen_at: value.seen_at.map(|seen_at| seen_at.to_rfc3339()),
            is_edited: value.is_edited,
            editable_until: value.editable_until.to_rfc3339(),
        }
    }
}

/// Board readout for the requesting member.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoticeStatusBody {
    /// Latest notice, or `null` for an empty board.
    pub notice: Option<NoticeBody>,
    /// `EMPTY`, `POSTED_UNSEEN`, `POSTED_SEEN_COOLDOWN` or `POSTED_SEEN_READY`.
    #[schema(example = "POSTED_SEEN_COOLDOWN")]
    pub state: String,
    /// Whether a post by the requester would be accepted now.
    pub can_post: bool,
    /// The rejection a post would receive now.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "COOLDOWN_ACTIVE")]
    pub reason: Option<String>,
    /// Minutes until the rejection lifts, when time-bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_minutes: Option<u64>,
}

impl From<NoticeStatus> for NoticeStatusBody {
    fn from(value: NoticeStatus) -> Self {
        Self {
            notice: value.notice.map(NoticeBody::from),
            state: value.state.as_str().to_owned(),
            can_post: value.can_post,
            reason: value.reason.map(|reason| reason.reason().to_owned()),
            remaining_minutes: value.reason.and_then(|reason| reason.remaining_minutes()),
        }
    }
}

/// Latest notice and whether the requester may post.
#[utoipa::path(
    get,
    path = "/api/v1/pairs/{pair_id}/notice",
    params(("pair_id" = String, Path, description = "Pair identifier")),
    responses(
        (status = 200, description = "Board status", body = NoticeStatusBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not a member of the pair", body = ErrorSchema),
        (status = 404, description = "Pair not found or incomplete", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["notice"],
    operation_id = "getNotice",
    security(("SessionCookie" = []))
)]
#[get("/pairs/{pair_id}/notice")]
pub async fn get_notice(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<NoticeStatusBody>> {
    let actor = session.require_pair_actor(&path)?;
    let status = state.notices_query.status(actor).await?;
    Ok(web::Json(NoticeStatusBody::from(status)))
}

/// Post a new notice when it is the requester's turn.
#[utoipa::path(
    post,
    path = "/api/v1/pairs/{pair_id}/notice",
    params(("pair_id" = String, Path, description = "Pair identifier")),
    request_body = NoticeContentBody,
    responses(
        (status = 200, description = "Notice posted", body = NoticeBody),
        (status = 400, description = "Invalid content or PENDING_UNSEEN / COOLDOWN_ACTIVE", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not a member of the pair", body = ErrorSchema),
        (status = 404, description = "Pair not found or incomplete", body = ErrorSchema),
        (status = 409, description = "Lost a concurrent posting race", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["notice"],
    operation_id = "postNotice",
    security(("SessionCookie" = []))
)]
#[post("/pairs/{pair_id}/notice")]
pub async fn post_notice(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<NoticeContentBody>,
) -> ApiResult<web::Json<NoticeBody>> {
    let actor = session.require_pair_actor(&path)?;
    let content = parse_content(payload.into_inner().content, FieldName::new("content"))?;
    let notice = state.notices.post(actor, content).await?;
    Ok(web::Json(NoticeBody::from(notice)))
}

/// Use the author's single edit on the latest notice.
#[utoipa::path(
    put,
    path = "/api/v1/pairs/{pair_id}/notice",
    params(("pair_id" = String, Path, description = "Pair identifier")),
    request_body = NoticeContentBody,
    responses(
        (status = 200, description = "Notice edited", body = NoticeBody),
        (status = 400, description = "Invalid content or NO_EDITABLE_NOTICE / ALREADY_EDITED / EDIT_WINDOW_CLOSED", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not a member of the pair", body = ErrorSchema),
        (status = 404, description = "Pair not found or incomplete", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["notice"],
    operation_id = "editNotice",
    security(("SessionCookie" = []))
)]
#[put("/pairs/{pair_id}/notice")]
pub async fn edit_notice(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<NoticeContentBody>,
) -> ApiResult<web::Json<NoticeBody>> {
    let actor = session.require_pair_actor(&path)?;
    let content = parse_content(payload.into_inner().content, FieldName::new("content"))?;
    let notice = state.notices.edit(actor, content).await?;
    Ok(web::Json(NoticeBody::from(notice)))
}

/// Acknowledge the partner's latest notice.
#[utoipa::path(
    post,
    path = "/api/v1/pairs/{pair_id}/notice/seen",
    params(("pair_id" = String, Path, description = "Pair identifier")),
    responses(
        (status = 200, description = "Notice marked seen", body = NoticeBody),
        (status = 400, description = "OWN_NOTICE", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not a member of the pair", body = ErrorSchema),
        (status = 404, description = "No notice to acknowledge", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["notice"],
    operation_id = "markNoticeSeen",
    security(("SessionCookie" = []))
)]
#[post("/pairs/{pair_id}/notice/seen")]
pub async fn mark_notice_seen(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<NoticeBody>> {
    let actor = session.require_pair_actor(&path)?;
    let notice = state.notices.mark_seen(actor).await?;
    Ok(web::Json(NoticeBody::from(notice)))
}

#[cfg(test)]
#[path = "notice_tests.rs"]
mod tests;
