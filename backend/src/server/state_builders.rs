//! Builders for the driven adapters and the HTTP state that sits on them.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use pairspace::domain::ports::{
    DisabledPushTransport, GossipRepository, LedgerRepository, MoodRepository, NoticeRepository,
    NotificationRepository, NotificationSink, PairDirectory, PushTransport,
    SubscriptionRepository,
};
use pairspace::domain::{
    BackgroundDispatcher, DailyClickService, GossipService, MoodPromptService, MoodService,
    NoticeService, NotificationComposer, NotificationDispatcher, NotificationInboxService,
    SubscriptionService,
};
use pairspace::inbound::http::state::{HttpState, HttpStatePorts};
use pairspace::outbound::memory::InMemoryStore;
use pairspace::outbound::persistence::{
    DbPool, DieselGossipRepository, DieselLedgerRepository, DieselMoodRepository,
    DieselNoticeRepository, DieselNotificationRepository, DieselPairDirectory,
    DieselSubscriptionRepository,
};
use pairspace::outbound::push::{WebPushConfig, WebPushTransport};

use super::{InteractionOptions, ServerConfig};

/// Every driven port the services depend on.
struct Adapters {
    directory: Arc<dyn PairDirectory>,
    ledger: Arc<dyn LedgerRepository>,
    notices: Arc<dyn NoticeRepository>,
    gossip: Arc<dyn GossipRepository>,
    moods: Arc<dyn MoodRepository>,
    notifications: Arc<dyn NotificationRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl Adapters {
    fn postgres(pool: &DbPool) -> Self {
        Self {
            directory: Arc::new(DieselPairDirectory::new(pool.clone())),
            ledger: Arc::new(DieselLedgerRepository::new(pool.clone())),
            notices: Arc::new(DieselNoticeRepository::new(pool.clone())),
            gossip: Arc::new(DieselGossipRepository::new(pool.clone())),
            moods: Arc::new(DieselMoodRepository::new(pool.clone())),
            notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
            subscriptions: Arc::new(DieselSubscriptionRepository::new(pool.clone())),
        }
    }

    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            directory: store.clone(),
            ledger: store.clone(),
            notices: store.clone(),
            gossip: store.clone(),
            moods: store.clone(),
            notifications: store.clone(),
            subscriptions: store,
        }
    }

    fn from_config(config: &ServerConfig) -> Self {
        match &config.db_pool {
            Some(pool) => Self::postgres(pool),
            None => {
                warn!("no database configured; pair data lives in memory only");
                Self::in_memory()
            }
        }
    }
}

fn build_push_transport(push: Option<&WebPushConfig>) -> std::io::Result<Arc<dyn PushTransport>> {
    match push {
        Some(push) => {
            let transport = WebPushTransport::new(push.clone())
                .map_err(|error| std::io::Error::other(format!("web push setup failed: {error}")))?;
            info!("web push delivery enabled");
            Ok(Arc::new(transport))
        }
        None => {
            warn!("no VAPID key configured; push delivery disabled");
            Ok(Arc::new(DisabledPushTransport))
        }
    }
}

fn build_composer(options: &InteractionOptions) -> NotificationComposer {
    options
        .composer_seed
        .map_or_else(NotificationComposer::from_entropy, NotificationComposer::seeded)
}

/// Build the handler state and start the notification worker.
///
/// Must run inside a Tokio runtime. The worker stops once the returned state
/// and every clone of it are dropped.
///
/// # Errors
/// Returns [`std::io::Error`] when the push transport cannot be configured.
pub(crate) fn build_http_state(
    config: &ServerConfig,
) -> std::io::Result<(web::Data<HttpState>, JoinHandle<()>)> {
    let options = &config.interactions;
    let adapters = Adapters::from_config(config);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let dispatcher = Arc::new(NotificationDispatcher::new(
        adapters.notifications.clone(),
        adapters.subscriptions.clone(),
        build_push_transport(options.push.as_ref())?,
        Arc::new(build_composer(options)),
        clock.clone(),
    ));
    let (sink, worker) = BackgroundDispatcher::spawn(dispatcher, options.dispatch_concurrency);
    let sink: Arc<dyn NotificationSink> = Arc::new(sink);

    let daily_click = Arc::new(DailyClickService::new(
        adapters.directory.clone(),
        adapters.ledger,
        sink.clone(),
        clock.clone(),
        options.ledger_policy,
    ));
    let notices = Arc::new(NoticeService::new(
        adapters.directory.clone(),
        adapters.notices,
        sink.clone(),
        clock.clone(),
        options.notice_rules,
    ));
    let moods = Arc::new(MoodService::new(
        adapters.directory.clone(),
        adapters.moods,
        sink.clone(),
        clock.clone(),
    ));
    let gossip = Arc::new(GossipService::new(
        adapters.directory.clone(),
        adapters.gossip,
        sink.clone(),
        clock.clone(),
    ));

    let ports = HttpStatePorts {
        daily_click: daily_click.clone(),
        daily_click_query: daily_click,
        notices: notices.clone(),
        notices_query: notices,
        gossip,
        moods: moods.clone(),
        moods_query: moods,
        inbox: Arc::new(NotificationInboxService::new(adapters.notifications)),
        push: Arc::new(SubscriptionService::new(adapters.subscriptions, clock)),
        mood_prompt: Arc::new(MoodPromptService::new(adapters.directory, sink)),
    };

    let state = HttpState::new(ports, options.cron_secret.clone());
    Ok((web::Data::new(state), worker))
}
