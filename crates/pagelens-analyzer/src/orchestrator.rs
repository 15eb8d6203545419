//! Scan orchestration: drives the token loop, fans tokens out to the
//! extractors and the login detector in a fixed order, and manages the
//! liveness pool's lifecycle around the scan.
//!
//! The orchestrator receives its collaborators by constructor — the fetch
//! capability and the worker count are injected, never ambient — so every
//! scan is independently testable and cancelable.

use crate::error::{ScanError, ScanOutcome};
use crate::extract::{HeadingCounter, TitleExtractor, VersionExtractor};
use crate::links::LinkClassifier;
use crate::liveness::LivenessPool;
use crate::login::LoginDetector;
use crate::report::{PageSnapshot, ScanState};
use crate::source::{HtmlTokenSource, TokenSource};
use pagelens_core::TargetUrl;
use pagelens_fetch::BodyFetcher;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// Emission channel capacity; many writers, one reader.
const SNAPSHOT_BUFFER: usize = 64;

/// Liveness job queue capacity. A full queue briefly backpressures the
/// link classifier, bounding outstanding probes regardless of page size.
const JOB_BUFFER: usize = 64;

/// Entry point for page scans.
pub struct PageAnalyzer {
    fetcher: Arc<dyn BodyFetcher>,
    workers: usize,
}

/// A running scan: incremental snapshots, the final outcome, and the
/// cancellation signal.
pub struct ScanSession {
    /// One snapshot per newly discovered fact, closed after the outcome
    /// is determined.
    pub snapshots: mpsc::Receiver<PageSnapshot>,
    /// Resolves exactly once, at stream end.
    pub outcome: oneshot::Receiver<ScanOutcome>,
    cancel: CancellationToken,
}

impl ScanSession {
    /// Token that stops the scan promptly when cancelled: no further
    /// tokens are read and no new probe jobs are dispatched.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl PageAnalyzer {
    /// Create an analyzer over the given fetch capability with a fixed
    /// liveness pool size per scan.
    #[must_use]
    pub fn new(fetcher: Arc<dyn BodyFetcher>, workers: usize) -> Self {
        Self { fetcher, workers }
    }

    /// Start scanning `url` in the background and return the session.
    #[must_use]
    pub fn start(&self, url: TargetUrl) -> ScanSession {
        let (snapshot_tx, snapshot_rx) = mpsc::channel(SNAPSHOT_BUFFER);
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let cancel = CancellationToken::new();

        let fetcher = self.fetcher.clone();
        let workers = self.workers;
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let outcome = drive_scan(fetcher, workers, &url, &snapshot_tx, &task_cancel).await;
            if outcome_tx.send(outcome).is_err() {
                tracing::debug!(url = url.as_str(), "scan consumer gone before outcome delivery");
            }
            // The emission channel closes only now, after the outcome: a
            // consumer always sees every fact before completion.
            drop(snapshot_tx);
        });

        ScanSession {
            snapshots: snapshot_rx,
            outcome: outcome_rx,
            cancel,
        }
    }
}

/// Run one scan to completion and produce its outcome.
async fn drive_scan(
    fetcher: Arc<dyn BodyFetcher>,
    workers: usize,
    url: &TargetUrl,
    snapshots: &mpsc::Sender<PageSnapshot>,
    cancel: &CancellationToken,
) -> ScanOutcome {
    let source = HtmlTokenSource::new(fetcher.clone());
    let stream = match source.open(url.as_str()).await {
        Ok(stream) => stream,
        Err(err) => {
            // The page itself is unreachable: no snapshots, no pool.
            tracing::warn!(url = url.as_str(), %err, "failed to open token stream");
            return Err(ScanError::Fetch(err));
        }
    };

    let state = Arc::new(ScanState::default());
    let (job_tx, job_rx) = mpsc::channel(JOB_BUFFER);
    // Workers start before the first token so probes overlap the scan.
    let pool = LivenessPool::start(
        workers,
        fetcher,
        url.url().clone(),
        state.clone(),
        job_rx,
        snapshots.clone(),
        cancel.clone(),
    );

    let mut title = TitleExtractor::default();
    let version = VersionExtractor;
    let headings = HeadingCounter;
    let classifier = LinkClassifier::new(url.url().clone());
    let mut login = LoginDetector::default();

    let mut failure = None;
    for item in stream {
        if cancel.is_cancelled() {
            tracing::debug!(url = url.as_str(), "scan cancelled, stopping token loop");
            break;
        }
        let token = match item {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(url = url.as_str(), %err, "token stream failed mid-scan");
                failure = Some(ScanError::Tokenize(err));
                break;
            }
        };

        // Fixed dispatch order; token order is source order.
        if let Some(snapshot) = title.observe(&token, &state) {
            let _ = snapshots.send(snapshot).await;
        }
        if let Some(snapshot) = version.observe(&token, &state) {
            let _ = snapshots.send(snapshot).await;
        }
        if let Some(snapshot) = headings.observe(&token, &state) {
            let _ = snapshots.send(snapshot).await;
        }
        classifier.observe(&token, &state, &job_tx, snapshots).await;
        if let Some(snapshot) = login.observe(&token, &state) {
            let _ = snapshots.send(snapshot).await;
        }
    }

    // Close the queue and wait for the pool to drain so every discovered
    // link has its classification before the outcome is reported.
    drop(job_tx);
    pool.join().await;

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
