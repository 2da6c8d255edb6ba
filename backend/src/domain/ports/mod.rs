//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`, [`GossipFeed`], [`NotificationInbox`],
//! [`PushRegistry`]) are what inbound adapters call. Driven ports
//! (`*Repository`, [`PairDirectory`], [`PushTransport`],
//! [`NotificationSink`]) are what outbound adapters implement.

mod macros;
pub(crate) use macros::define_port_error;

mod daily_click;
mod gossip_feed;
mod gossip_repository;
mod ledger_repository;
mod mood_check_in;
mod mood_prompt;
mod mood_repository;
mod notice_board;
mod notice_repository;
mod notification_inbox;
mod notification_repository;
mod notification_sink;
mod pair_directory;
mod push_registry;
mod push_transport;
mod subscription_repository;

#[cfg(test)]
pub use daily_click::{MockDailyClickCommand, MockDailyClickQuery};
pub use daily_click::{
    ClickOutcome, ClickStatus, DailyClickCommand, DailyClickQuery, DailyClickRequest,
};
pub use gossip_feed::GossipFeed;
#[cfg(test)]
pub use gossip_feed::MockGossipFeed;
#[cfg(test)]
pub use gossip_repository::MockGossipRepository;
pub use gossip_repository::{GossipRepository, GossipRepositoryError};
#[cfg(test)]
pub use ledger_repository::MockLedgerRepository;
pub use ledger_repository::{LedgerRepository, LedgerRepositoryError};
#[cfg(test)]
pub use mood_check_in::{MockMoodCommand, MockMoodQuery};
pub use mood_check_in::{MoodCommand, MoodQuery};
#[cfg(test)]
pub use mood_prompt::MockMoodPromptCommand;
pub use mood_prompt::{MoodPromptCommand, MoodPromptReport};
#[cfg(test)]
pub use mood_repository::MockMoodRepository;
pub use mood_repository::{MoodRepository, MoodRepositoryError};
#[cfg(test)]
pub use notice_board::{MockNoticeBoardCommand, MockNoticeBoardQuery};
pub use notice_board::{NoticeBoardCommand, NoticeBoardQuery, NoticeStatus};
#[cfg(test)]
pub use notice_repository::MockNoticeRepository;
pub use notice_repository::{NoticeRepository, NoticeRepositoryError};
#[cfg(test)]
pub use notification_inbox::MockNotificationInbox;
pub use notification_inbox::{NOTIFICATION_LIST_LIMIT, NotificationInbox};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{
    FixtureNotificationRepository, NotificationRepository, NotificationRepositoryError,
};
#[cfg(test)]
pub use notification_sink::MockNotificationSink;
pub use notification_sink::{
    FixtureNotificationSink, NotificationSink, NotificationSinkError, submit_detached,
};
#[cfg(test)]
pub use pair_directory::MockPairDirectory;
pub use pair_directory::{PairDirectory, PairDirectoryError};
#[cfg(test)]
pub use push_registry::MockPushRegistry;
pub use push_registry::PushRegistry;
#[cfg(test)]
pub use push_transport::MockPushTransport;
pub use push_transport::{DisabledPushTransport, PushDeliveryError, PushTransport};
#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
pub use subscription_repository::{SubscriptionRepository, SubscriptionRepositoryError};

#[cfg(test)]
mod tests;
