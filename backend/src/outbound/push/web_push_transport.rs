//! Reqwest-backed Web Push transport.
//!
//! The `web-push` crate encrypts the payload (aes128gcm) and signs the VAPID
//! claims; this adapter owns the HTTP exchange and maps the push service's
//! answer onto [`PushDeliveryError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use tracing::debug;
use web_push::{
    ContentEncoding, PartialVapidSignatureBuilder, SubscriptionInfo, URL_SAFE, Urgency,
    VapidSignatureBuilder, WebPushMessage, WebPushMessageBuilder,
};

use crate::domain::ports::{PushDeliveryError, PushTransport};
use crate::domain::{PushMessage, PushSubscription};

/// Topic shared by every message so a push service may collapse superseded
/// notifications still waiting for an offline device.
pub const PUSH_TOPIC: &str = "partner-notification";

const DEFAULT_TTL_SECONDS: u32 = 3600;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for [`WebPushTransport`].
#[derive(Debug, Clone)]
pub struct WebPushConfig {
    /// URL-safe base64 VAPID private key.
    pub vapid_private_key: String,
    /// VAPID `sub` claim, usually a `mailto:` URL.
    pub vapid_subject: String,
    /// How long the push service should hold an undelivered message.
    pub ttl_seconds: u32,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl WebPushConfig {
    /// Settings with the default TTL and timeout.
    pub fn new(vapid_private_key: impl Into<String>, vapid_subject: impl Into<String>) -> Self {
        Self {
            vapid_private_key: vapid_private_key.into(),
            vapid_subject: vapid_subject.into(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the message TTL.
    #[must_use]
    pub const fn with_ttl_seconds(mut self, ttl_seconds: u32) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// Override the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Errors raised while constructing a [`WebPushTransport`].
#[derive(Debug, thiserror::Error)]
pub enum WebPushTransportError {
    /// The VAPID key could not be decoded.
    #[error("invalid VAPID private key: {message}")]
    InvalidVapidKey {
        /// Decoder message.
        message: String,
    },
    /// The HTTP client could not be built.
    #[error("failed to build push HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// [`PushTransport`] delivering VAPID-signed messages over HTTP.
pub struct WebPushTransport {
    client: Client,
    vapid: PartialVapidSignatureBuilder,
    subject: String,
    ttl_seconds: u32,
}

impl WebPushTransport {
    /// Decode the VAPID key and build the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`WebPushTransportError`] when the key is not a valid URL-safe
    /// base64 P-256 private key or the client cannot be constructed.
    pub fn new(config: WebPushConfig) -> Result<Self, WebPushTransportError> {
        let vapid = VapidSignatureBuilder::from_base64_no_sub(config.vapid_private_key.trim(), URL_SAFE)
            .map_err(|error| WebPushTransportError::InvalidVapidKey {
                message: error.to_string(),
            })?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            vapid,
            subject: config.vapid_subject,
            ttl_seconds: config.ttl_seconds.max(1),
        })
    }

    fn build_message(
        &self,
        subscription: &PushSubscription,
        message: &PushMessage,
    ) -> Result<WebPushMessage, PushDeliveryError> {
        let descriptor = &subscription.descriptor;
        let info = SubscriptionInfo::new(
            descriptor.endpoint.as_str(),
            descriptor.keys.p256dh.as_str(),
            descriptor.keys.auth.as_str(),
        );
        let payload = encode_payload(message)?;

        let mut signature = self.vapid.clone().add_sub_info(&info);
        signature.add_claim("sub", self.subject.as_str());
        let signature = signature.build().map_err(invalid_subscription)?;

        let mut builder = WebPushMessageBuilder::new(&info);
        builder.set_payload(ContentEncoding::Aes128Gcm, &payload);
        builder.set_vapid_signature(signature);
        builder.set_ttl(self.ttl_seconds);
        builder.set_urgency(Urgency::High);
        builder.set_topic(PUSH_TOPIC.to_owned());
        builder.build().map_err(invalid_subscription)
    }
}

/// Serialise the `{title, body, pairId}` payload the service worker renders.
fn encode_payload(message: &PushMessage) -> Result<Vec<u8>, PushDeliveryError> {
    serde_json::to_vec(message).map_err(|error| PushDeliveryError::transport(error.to_string()))
}

fn invalid_subscription(error: web_push::WebPushError) -> PushDeliveryError {
    PushDeliveryError::invalid_subscription(error.to_string())
}

/// Map the push service's status onto a delivery outcome.
///
/// 404 and 410 mean the endpoint will never accept messages again.
fn classify_status(status: StatusCode) -> Result<(), PushDeliveryError> {
    match status {
        _ if status.is_success() => Ok(()),
        StatusCode::NOT_FOUND | StatusCode::GONE => Err(PushDeliveryError::gone(status.as_u16())),
        _ => Err(PushDeliveryError::rejected(status.as_u16())),
    }
}

fn map_transport_error(error: &reqwest::Error) -> PushDeliveryError {
    if error.is_timeout() {
        PushDeliveryError::transport("push service timed out")
    } else {
        PushDeliveryError::transport(error.to_string())
    }
}

#[async_trait]
impl PushTransport for WebPushTransport {
    async fn send(
        &self,
        subscription: &PushSubscription,
        message: &PushMessage,
    ) -> Result<(), PushDeliveryError> {
        let push = self.build_message(subscription, message)?;
        let mut request = self
            .client
            .post(push.endpoint.to_string())
            .header("TTL", push.ttl.to_string())
            .header("Urgency", "high")
            .header("Topic", PUSH_TOPIC);
        request = match push.payload {
            Some(payload) => {
                let mut request = request
                    .header(header::CONTENT_ENCODING, payload.content_encoding.to_str())
                    .header(header::CONTENT_TYPE, "application/octet-stream");
                for (name, value) in payload.crypto_headers {
                    request = request.header(name, value);
                }
                request.body(payload.content)
            }
            None => request.header(header::CONTENT_LENGTH, "0"),
        };

        let response = request
            .send()
            .await
            .map_err(|error| map_transport_error(&error))?;
        let status = response.status();
        debug!(
            subscription_id = %subscription.id,
            endpoint_host = %subscription.descriptor.endpoint_host(),
            status = status.as_u16(),
            "push service answered"
        );
        classify_status(status)
    }
}
