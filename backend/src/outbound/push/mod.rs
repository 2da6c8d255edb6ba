//! Web Push outbound adapter.
//!
//! Implements the `PushTransport` port over HTTP with VAPID authentication.

mod web_push_transport;

pub use web_push_transport::{
    PUSH_TOPIC, WebPushConfig, WebPushTransport, WebPushTransportError,
};
