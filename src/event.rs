//! Progress events emitted by a discovery pipeline.
//!
//! Events flow over a bounded, single-consumer channel: producers block
//! when the consumer lags (order is never traded for throughput), and a
//! dropped receiver reads as cancellation at the producer's next emit.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::error::DiscoveryError;
use crate::parser::ParsedAsset;
use crate::score::CpeCandidate;

/// Pipeline phases, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Parsing,
    Searching,
    Scoring,
    Ranking,
    Completed,
    Error,
}

/// Final payload delivered with the `completed` event.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryReport {
    /// The parsed asset the search ran from.
    pub parsed: ParsedAsset,
    /// Ranked candidates, best first.
    pub candidates: Vec<CpeCandidate>,
    /// Number of returned candidates.
    pub count: usize,
    /// Total matches the catalog reported for the winning query.
    pub total_found: u64,
}

/// One event on the progress stream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProgressEvent {
    /// A stage is underway.
    Progress { phase: Phase, message: String },
    /// Terminal success, carrying the ranked result.
    Completed {
        phase: Phase,
        message: String,
        payload: DiscoveryReport,
    },
    /// Terminal failure. The channel closes after this.
    Error { phase: Phase, message: String },
}

impl ProgressEvent {
    /// The phase this event belongs to.
    pub fn phase(&self) -> Phase {
        match self {
            ProgressEvent::Progress { phase, .. }
            | ProgressEvent::Completed { phase, .. }
            | ProgressEvent::Error { phase, .. } => *phase,
        }
    }

    /// Whether this event terminates the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProgressEvent::Completed { .. } | ProgressEvent::Error { .. }
        )
    }
}

/// Sending half of the progress channel.
///
/// Every send doubles as a cancellation check: a closed channel means the
/// consumer walked away, surfaced as [`DiscoveryError::Cancelled`].
pub(crate) struct ProgressSender {
    tx: mpsc::Sender<ProgressEvent>,
}

impl ProgressSender {
    pub(crate) fn new(tx: mpsc::Sender<ProgressEvent>) -> Self {
        Self { tx }
    }

    pub(crate) async fn progress(
        &self,
        phase: Phase,
        message: impl Into<String>,
    ) -> Result<(), DiscoveryError> {
        self.send(ProgressEvent::Progress {
            phase,
            message: message.into(),
        })
        .await
    }

    pub(crate) async fn completed(
        &self,
        message: impl Into<String>,
        payload: DiscoveryReport,
    ) -> Result<(), DiscoveryError> {
        self.send(ProgressEvent::Completed {
            phase: Phase::Ranking,
            message: message.into(),
            payload,
        })
        .await
    }

    /// Terminal error delivery. Best effort: if the consumer is already
    /// gone there is nobody left to tell.
    pub(crate) async fn error(&self, phase: Phase, message: impl Into<String>) {
        let _ = self
            .send(ProgressEvent::Error {
                phase,
                message: message.into(),
            })
            .await;
    }

    async fn send(&self, event: ProgressEvent) -> Result<(), DiscoveryError> {
        self.tx
            .send(event)
            .await
            .map_err(|_| DiscoveryError::Cancelled)
    }
}
