//! Port for the append-only action ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    ActionKind, LedgerAppend, LedgerAppendOutcome, PairId, UserId, WindowSummary,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ledger repository adapters.
    pub enum LedgerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "ledger repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ledger repository query failed: {message}",
    }
}

/// Ledger persistence.
///
/// Implementations must make the window count and the append of
/// [`LedgerRepository::append_if_allowed`] atomic per pair so two concurrent
/// clicks cannot both slip under a cap.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Count records since `append.window_start` and append a new one unless
    /// `append.cap` is already reached.
    async fn append_if_allowed(
        &self,
        append: &LedgerAppend,
    ) -> Result<LedgerAppendOutcome, LedgerRepositoryError>;

    /// Count records for `(pair, actor, kind)` at or after `since`.
    async fn window_summary(
        &self,
        pair_id: &PairId,
        actor_id: &UserId,
        kind: ActionKind,
        since: DateTime<Utc>,
    ) -> Result<WindowSummary, LedgerRepositoryError>;
}
