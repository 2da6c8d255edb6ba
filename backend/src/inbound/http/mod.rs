//! HTTP inbound adapter exposing REST endpoints.

pub mod cron;
pub mod daily_click;
pub mod error;
pub mod gossip;
pub mod health;
pub mod mood;
pub mod notice;
pub mod notifications;
pub mod push;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// The caller owns the scope so it can attach the session middleware.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(daily_click::daily_click)
        .service(daily_click::daily_click_status)
        .service(notice::get_notice)
        .service(notice::post_notice)
        .service(notice::edit_notice)
        .service(notice::mark_notice_seen)
        .service(gossip::list_gossip)
        .service(gossip::post_gossip)
        .service(gossip::react_gossip)
        .service(gossip::reread_gossip)
        .service(mood::record_mood)
        .service(mood::partner_mood)
        .service(notifications::list_notifications)
        .service(notifications::mark_notification_read)
        .service(push::subscribe)
        .service(push::unsubscribe)
        .service(cron::mood_prompt)
        .service(cron::mood_prompt_get);
}
