//! Full-stack HTTP harness for pair interaction tests.
//!
//! Real services run over the in-memory store. Notifications flow through the
//! background dispatcher into the store's history and a scripted push
//! transport, so tests observe both delivery channels.

use std::sync::Arc;
use std::time::Duration;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, post, test as actix_test, web};
use chrono::{TimeZone, Utc};
use pairspace::domain::ports::NotificationSink;
use pairspace::domain::{
    BackgroundDispatcher, DailyClickService, GossipService, LedgerPolicy, MoodPromptService,
    MoodService, NoticeRules, NoticeService, NotificationComposer, NotificationDispatcher,
    NotificationInboxService, NotificationQueueEntry, SubscriptionService, UserId,
};
use pairspace::inbound::http::error::json_error_handler;
use pairspace::inbound::http::session::SessionContext;
use pairspace::inbound::http::state::{CronSecret, HttpState, HttpStatePorts};
use pairspace::inbound::http::{ApiResult, configure_api};
use pairspace::outbound::memory::InMemoryStore;
use pairspace::test_support::clock::MutableClock;
use pairspace::test_support::notifications::ScriptedPushTransport;
use pairspace::test_support::pairs::AliceAndBob;

/// Secret accepted by the cron trigger.
pub const CRON_SECRET: &str = "tick-tock";

/// Everything a test needs to drive and observe the stack.
pub struct PairApp {
    /// Shared store backing every port.
    pub store: Arc<InMemoryStore>,
    /// Push transport recording each send.
    pub transport: Arc<ScriptedPushTransport>,
    /// The pair under test.
    pub pair: AliceAndBob,
    /// Handler state.
    pub state: HttpState,
}

impl PairApp {
    /// Wire the stack. Must run inside a Tokio runtime.
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        ));
        let transport = Arc::new(ScriptedPushTransport::default());
        let pair = AliceAndBob::new();
        store.add_pair(pair.pair_id, [pair.alice.clone(), pair.bob.clone()]);

        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            store.clone(),
            transport.clone(),
            Arc::new(NotificationComposer::seeded(7)),
            clock.clone(),
        ));
        let (background, _worker) = BackgroundDispatcher::spawn(dispatcher, 4);
        let sink: Arc<dyn NotificationSink> = Arc::new(background);

        let daily_click = Arc::new(DailyClickService::new(
            store.clone(),
            store.clone(),
            sink.clone(),
            clock.clone(),
            LedgerPolicy::default(),
        ));
        let notices = Arc::new(NoticeService::new(
            store.clone(),
            store.clone(),
            sink.clone(),
            clock.clone(),
            NoticeRules::default(),
        ));
        let moods = Arc::new(MoodService::new(
            store.clone(),
            store.clone(),
            sink.clone(),
            clock.clone(),
        ));
        let ports = HttpStatePorts {
            daily_click: daily_click.clone(),
            daily_click_query: daily_click,
            notices: notices.clone(),
            notices_query: notices,
            gossip: Arc::new(GossipService::new(
                store.clone(),
                store.clone(),
                sink.clone(),
                clock.clone(),
            )),
            moods: moods.clone(),
            moods_query: moods,
            inbox: Arc::new(NotificationInboxService::new(store.clone())),
            push: Arc::new(SubscriptionService::new(store.clone(), clock.clone())),
            mood_prompt: Arc::new(MoodPromptService::new(store.clone(), sink)),
        };

        Self {
            state: HttpState::new(ports, CronSecret::new(CRON_SECRET)),
            store,
            transport,
            pair,
        }
    }

    /// Notifications recorded for `recipient`, waiting up to a second for
    /// `expected` entries to arrive from the background worker.
    pub async fn notifications_for(
        &self,
        recipient: &UserId,
        expected: usize,
    ) -> Vec<NotificationQueueEntry> {
        for _ in 0..100 {
            let entries: Vec<_> = self
                .store
                .notifications()
                .into_iter()
                .filter(|entry| entry.recipient_id == *recipient)
                .collect();
            if entries.len() >= expected {
                return entries;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for {expected} notifications");
    }
}

/// Stands in for the identity collaborator.
#[post("/test-login/{user_id}")]
async fn test_login(session: SessionContext, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let user_id = UserId::new(path.into_inner())
        .map_err(|error| pairspace::domain::Error::invalid_request(error.to_string()))?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// App exposing the API scope plus the test login route.
pub fn build_app(
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
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/api/v1")
                .wrap(session)
                .service(test_login)
                .configure(configure_api),
        )
}

/// Log in as `user_id` and return the session cookie.
pub async fn login_as(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    user_id: &UserId,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/test-login/{user_id}"))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
