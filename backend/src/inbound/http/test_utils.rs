//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, post, test as actix_test, web};

use crate::domain::ports::{
    MockDailyClickCommand, MockDailyClickQuery, MockGossipFeed, MockMoodCommand,
    MockMoodPromptCommand, MockMoodQuery, MockNoticeBoardCommand, MockNoticeBoardQuery,
    MockNotificationInbox, MockPushRegistry,
};
use crate::domain::{PairId, UserId};
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::validation::{FieldName, parse_identifier};
use crate::inbound::http::{ApiResult, configure_api};

/// Fixture user id for Alice.
pub const ALICE: &str = "11111111-1111-4111-8111-111111111111";
/// Fixture user id for Bob.
pub const BOB: &str = "22222222-2222-4222-8222-222222222222";
/// Fixture pair id shared by Alice and Bob.
pub const PAIR: &str = "33333333-3333-4333-8333-333333333333";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Alice as a [`UserId`].
pub fn alice() -> UserId {
    UserId::new(ALICE).expect("fixture id")
}

/// Bob as a [`UserId`].
pub fn bob() -> UserId {
    UserId::new(BOB).expect("fixture id")
}

/// The fixture pair as a [`PairId`].
pub fn pair() -> PairId {
    PairId::new(PAIR).expect("fixture id")
}

/// Stands in for the identity collaborator by writing the path's user id into
/// the session.
#[post("/test-login/{user_id}")]
async fn test_login(session: SessionContext, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let user_id: UserId = parse_identifier(&path.into_inner(), FieldName::new("userId"))?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Ports backed by mocks with no expectations; tests replace the ones they
/// exercise.
pub fn mock_ports() -> HttpStatePorts {
    HttpStatePorts {
        daily_click: Arc::new(MockDailyClickCommand::new()),
        daily_click_query: Arc::new(MockDailyClickQuery::new()),
        notices: Arc::new(MockNoticeBoardCommand::new()),
        notices_query: Arc::new(MockNoticeBoardQuery::new()),
        gossip: Arc::new(MockGossipFeed::new()),
        moods: Arc::new(MockMoodCommand::new()),
        moods_query: Arc::new(MockMoodQuery::new()),
        inbox: Arc::new(MockNotificationInbox::new()),
        push: Arc::new(MockPushRegistry::new()),
        mood_prompt: Arc::new(MockMoodPromptCommand::new()),
    }
}

/// App exposing the full API scope plus the test login route.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(test_login)
                .configure(configure_api),
        )
}

/// Log in as `user_id` and return the session cookie.
pub async fn login_as(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    user_id: &UserId,
) -> Cookie<'static> {
    let login_req = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/test-login/{user_id}"))
        .to_request();
    let login_res = actix_test::call_service(app, login_req).await;
    assert!(login_res.status().is_success());
    login_res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
