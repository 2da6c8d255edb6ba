//! Background notification worker.
//!
//! Services submit [`DispatchRequest`]s through [`BackgroundDispatcher`],
//! which implements the [`NotificationSink`] port over an unbounded channel.
//! A single spawned task drains the channel and runs each dispatch in a
//! `JoinSet`, keeping at most `concurrency` dispatches in flight. The worker
//! stops once every sender is dropped and in-flight work has finished.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{info, warn};

use super::{DispatchRequest, NotificationDispatcher};
use crate::domain::TraceId;
use crate::domain::ports::{NotificationSink, NotificationSinkError};

/// Channel-backed [`NotificationSink`].
#[derive(Clone)]
pub struct BackgroundDispatcher {
    sender: mpsc::UnboundedSender<DispatchRequest>,
}

impl BackgroundDispatcher {
    /// Spawn the worker on the current Tokio runtime.
    ///
    /// Returns the sink and the worker's handle. The worker exits when the
    /// last clone of the sink is dropped.
    #[must_use]
    pub fn spawn(
        dispatcher: Arc<NotificationDispatcher>,
        concurrency: usize,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_worker(dispatcher, receiver, concurrency.max(1)));
        (Self { sender }, handle)
    }
}

impl NotificationSink for BackgroundDispatcher {
    fn submit(&self, request: DispatchRequest) -> Result<(), NotificationSinkError> {
        self.sender
            .send(request)
            .map_err(|_| NotificationSinkError::closed())
    }
}

async fn run_worker(
    dispatcher: Arc<NotificationDispatcher>,
    mut receiver: mpsc::UnboundedReceiver<DispatchRequest>,
    concurrency: usize,
) {
    let mut in_flight = JoinSet::new();
    while let Some(request) = receiver.recv().await {
        while let Some(result) = in_flight.try_join_next() {
            log_join(result);
        }
        while in_flight.len() >= concurrency {
            if let Some(result) = in_flight.join_next().await {
                log_join(result);
            }
        }
        in_flight.spawn(run_job(Arc::clone(&dispatcher), request));
    }
    while let Some(result) = in_flight.join_next().await {
        log_join(result);
    }
    info!("notification worker stopped");
}

async fn run_job(dispatcher: Arc<NotificationDispatcher>, request: DispatchRequest) {
    match request.trace_id {
        Some(trace_id) => {
            TraceId::scope(trace_id, dispatcher.dispatch(request)).await;
        }
        None => {
            dispatcher.dispatch(request).await;
        }
    }
}

fn log_join(result: Result<(), JoinError>) {
    if let Err(error) = result {
        warn!(%error, "notification dispatch task failed");
    }
}
