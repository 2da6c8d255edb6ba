//! Pair interaction backend.
//!
//! Two partners share a private space: a turn-taking notice board, rate
//! limited daily buttons, an ephemeral gossip feed, and mood check-ins. Each
//! interaction can notify the partner through in-app history and web push.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
