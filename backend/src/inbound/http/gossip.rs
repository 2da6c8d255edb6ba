//! Gossip HTTP handlers.
//!
//! ```text
//! GET  /api/v1/pairs/{pair_id}/gossip
//! POST /api/v1/pairs/{pair_id}/gossip
//! POST /api/v1/pairs/{pair_id}/gossip/react
//! POST /api/v1/pairs/{pair_id}/gossip/reread
//! ```
//!
//! `react` and `reread` share one acknowledge-once transition; clients pick
//! the path that matches the button pressed.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{GossipId, GossipMessage};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_content, parse_identifier,
};

const MESSAGE_ID_FIELD: FieldName = FieldName::new("messageId");

/// Request payload for posting gossip.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GossipContentBody {
    /// Message text. `message` is accepted as an alias.
    #[serde(alias = "message")]
    pub content: Option<String>,
}

/// Request payload naming the message to acknowledge.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgeGossipBody {
    /// Gossip message identifier.
    #[schema(format = "uuid")]
    pub message_id: Option<String>,
}

/// Gossip message as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GossipBody {
    /// Message identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Posting member.
    #[schema(format = "uuid")]
    pub author_id: String,
    /// Message text.
    pub content: String,
    /// When it was posted.
    #[schema(format = "date-time")]
    pub created_at: String,
    /// Whether the recipient has listed it.
    pub seen: bool,
    /// When the recipient reacted or re-read it, or `null`.
    #[schema(format = "date-time")]
    pub acknowledged_at: Option<String>,
}

impl From<GossipMessage> for GossipBody {
    fn from(value: GossipMessage) -> Self {
        Self {
            id: value.id.to_string(),
            author_id: value.author_id.to_string(),
            content: value.content.as_str().to_owned(),
            created_at: value.created_at.to_rfc3339(),
            seen: value.seen,
            acknowledged_at: value.acknowledged_at.map(|at| at.to_rfc3339()),
        }
    }
}

/// The partner's unacknowledged messages, oldest first.
///
/// Listing marks the returned messages seen.
#[utoipa::path(
    get,
    path = "/api/v1/pairs/{pair_id}/gossip",
    params(("pair_id" = String, Path, description = "Pair identifier")),
    responses(
        (status = 200, description = "Active gossip", body = [GossipBody]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not a member of the pair", body = ErrorSchema),
        (status = 404, description = "Pair not found or incomplete", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["gossip"],
    operation_id = "listGossip",
    security(("SessionCookie" = []))
)]
#[get("/pairs/{pair_id}/gossip")]
pub async fn list_gossip(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<GossipBody>>> {
    let actor = session.require_pair_actor(&path)?;
    let messages = state.gossip.list_active(actor).await?;
    Ok(web::Json(messages.into_iter().map(GossipBody::from).collect()))
}

/// Post gossip for the partner.
#[utoipa::path(
    post,
    path = "/api/v1/pairs/{pair_id}/gossip",
    params(("pair_id" = String, Path, description = "Pair identifier")),
    request_body = GossipContentBody,
    responses(
        (status = 200, description = "Gossip posted", body = GossipBody),
        (status = 400, description = "Invalid content", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not a member of the pair", body = ErrorSchema),
        (status = 404, description = "Pair not found or incomplete", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["gossip"],
    operation_id = "postGossip",
    security(("SessionCookie" = []))
)]
#[post("/pairs/{pair_id}/gossip")]
pub async fn post_gossip(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<GossipContentBody>,
) -> ApiResult<web::Json<GossipBody>> {
    let actor = session.require_pair_actor(&path)?;
    let content = parse_content(payload.into_inner().content, FieldName::new("content"))?;
    let message = state.gossip.post(actor, content).await?;
    Ok(web::Json(GossipBody::from(message)))
}

async fn acknowledge(
    state: &HttpState,
    session: &SessionContext,
    raw_pair_id: &str,
    payload: AcknowledgeGossipBody,
) -> ApiResult<web::Json<GossipBody>> {
    let actor = session.require_pair_actor(raw_pair_id)?;
    let raw_id = payload
        .message_id
        .ok_or_else(|| missing_field_error(MESSAGE_ID_FIELD))?;
    let message_id: GossipId = parse_identifier(&raw_id, MESSAGE_ID_FIELD)?;
    let message = state.gossip.acknowledge(actor, message_id).await?;
    Ok(web::Json(GossipBody::from(message)))
}

/// React to a partner message.
#[utoipa::path(
    post,
    path = "/api/v1/pairs/{pair_id}/gossip/react",
    params(("pair_id" = String, Path, description = "Pair identifier")),
    request_body = AcknowledgeGossipBody,
    responses(
        (status = 200, description = "Message acknowledged", body = GossipBody),
        (status = 400, description = "OWN_MESSAGE / ALREADY_ACKNOWLEDGED", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not a member of the pair", body = ErrorSchema),
        (status = 404, description = "Message not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["gossip"],
    operation_id = "reactGossip",
    security(("SessionCookie" = []))
)]
#[post("/pairs/{pair_id}/gossip/react")]
pub async fn react_gossip(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<AcknowledgeGossipBody>,
) -> ApiResult<web::Json<GossipBody>> {
    acknowledge(&state, &session, &path, payload.into_inner()).await
}

/// Re-read a partner message. Same transition as reacting.
#[utoipa::path(
    post,
    path = "/api/v1/pairs/{pair_id}/gossip/reread",
    params(("pair_id" = String, Path, description = "Pair identifier")),
    request_body = AcknowledgeGossipBody,
    responses(
        (status = 200, description = "Message acknowledged", body = GossipBody),
        (status = 400, description = "OWN_MESSAGE / ALREADY_ACKNOWLEDGED", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not a member of the pair", body = ErrorSchema),
        (status = 404, description = "Message not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["gossip"],
    operation_id = "rereadGossip",
    security(("SessionCookie" = []))
)]
#[post("/pairs/{pair_id}/gossip/reread")]
pub async fn reread_gossip(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<AcknowledgeGossipBody>,
) -> ApiResult<web::Json<GossipBody>> {
    acknowledge(&state, &session, &path, payload.into_inner()).await
}
