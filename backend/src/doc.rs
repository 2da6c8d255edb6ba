//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every pair interaction endpoint, notification history, push
//!   registration, the cron trigger, and the health probes
//! - **Schemas**: request and response bodies plus the domain error wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`])
//! - **Security**: the shared session cookie and the cron bearer secret
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::cron::MoodPromptResponseBody;
use crate::inbound::http::daily_click::{
    DailyClickBody, DailyClickResponseBody, DailyClickStatusBody,
};
use crate::inbound::http::gossip::{AcknowledgeGossipBody, GossipBody, GossipContentBody};
use crate::inbound::http::mood::{MoodBody, MoodRequestBody};
use crate::inbound::http::notice::{NoticeBody, NoticeContentBody, NoticeStatusBody};
use crate::inbound::http::notifications::{NotificationBody, NotificationPayloadBody};
use crate::inbound::http::push::{
    SubscribeRequestBody, SubscriptionBody, SubscriptionKeysBody, UnsubscribeRequestBody,
    UnsubscribeResponseBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie and cron bearer
/// security schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by the identity service.",
            ))),
        );
        components.add_security_scheme(
            "CronBearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Shared secret configured for the scheduler."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Pairspace backend API",
        description = "Shared space for two partners: notices, daily buttons, gossip, moods, and notifications."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::daily_click::daily_click,
        crate::inbound::http::daily_click::daily_click_status,
        crate::inbound::http::notice::get_notice,
        crate::inbound::http::notice::post_notice,
        crate::inbound::http::notice::edit_notice,
        crate::inbound::http::notice::mark_notice_seen,
        crate::inbound::http::gossip::list_gossip,
        crate::inbound::http::gossip::post_gossip,
        crate::inbound::http::gossip::react_gossip,
        crate::inbound::http::gossip::reread_gossip,
        crate::inbound::http::mood::record_mood,
        crate::inbound::http::mood::partner_mood,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::mark_notification_read,
        crate::inbound::http::push::subscribe,
        crate::inbound::http::push::unsubscribe,
        crate::inbound::http::cron::mood_prompt,
        crate::inbound::http::cron::mood_prompt_get,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        DailyClickBody,
        DailyClickResponseBody,
        DailyClickStatusBody,
        NoticeContentBody,
        NoticeBody,
        NoticeStatusBody,
        GossipContentBody,
        AcknowledgeGossipBody,
        GossipBody,
        MoodRequestBody,
        MoodBody,
        NotificationPayloadBody,
        NotificationBody,
        SubscriptionKeysBody,
        SubscribeRequestBody,
        SubscriptionBody,
        UnsubscribeRequestBody,
        UnsubscribeResponseBody,
        MoodPromptResponseBody,
    )),
    tags(
        (name = "daily-click", description = "Rate limited daily buttons"),
        (name = "notice", description = "Turn-taking notice board"),
        (name = "gossip", description = "Ephemeral gossip feed"),
        (name = "mood", description = "Mood check-ins"),
        (name = "notifications", description = "In-app notification history"),
        (name = "push", description = "Web push registration"),
        (name = "cron", description = "Scheduled triggers"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document's shape.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_has_envelope_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "details");
        assert_object_schema_has_field(error_schema, "error");
        assert_object_schema_has_field(error_schema, "remainingMinutes");
    }

    #[rstest]
    #[case("/api/v1/pairs/{pair_id}/daily-click")]
    #[case("/api/v1/pairs/{pair_id}/notice")]
    #[case("/api/v1/pairs/{pair_id}/notice/seen")]
    #[case("/api/v1/pairs/{pair_id}/gossip")]
    #[case("/api/v1/pairs/{pair_id}/gossip/react")]
    #[case("/api/v1/pairs/{pair_id}/gossip/reread")]
    #[case("/api/v1/pairs/{pair_id}/mood")]
    #[case("/api/v1/notifications")]
    #[case("/api/v1/notifications/{notification_id}/read")]
    #[case("/api/v1/push/subscribe")]
    #[case("/api/v1/push/unsubscribe")]
    #[case("/api/v1/cron/mood-prompt")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn cron_trigger_accepts_get_and_post() {
        let doc = ApiDoc::openapi();
        let item = doc
            .paths
            .paths
            .get("/api/v1/cron/mood-prompt")
            .expect("cron path documented");
        assert!(item.get.is_some());
        assert!(item.post.is_some());
    }

    #[rstest]
    #[case("SessionCookie")]
    #[case("CronBearer")]
    fn security_schemes_are_registered(#[case] name: &str) {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(name));
    }
}
