//! Bounded worker pool for link liveness probing.
//!
//! A fixed set of workers drains the job queue the link classifier feeds.
//! Each href is resolved against the base page URL and probed through the
//! same fetch capability that retrieved the page; any error classifies the
//! link inactive. A probe failure never aborts the scan — it is consumed
//! right here as a classification.

use crate::links::resolve_against;
use crate::report::{PageSnapshot, ScanState};
use pagelens_fetch::BodyFetcher;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Handle over the running workers; joined once the scan's token loop ends.
pub struct LivenessPool {
    handles: Vec<JoinHandle<()>>,
}

impl LivenessPool {
    /// Start `workers` probe workers (at least one) draining `jobs`.
    ///
    /// Workers stop when the queue is closed and drained, or promptly
    /// after `cancel` fires — an in-flight probe finishes naturally, but
    /// no further job is taken.
    #[must_use]
    pub fn start(
        workers: usize,
        fetcher: Arc<dyn BodyFetcher>,
        base: Url,
        state: Arc<ScanState>,
        jobs: mpsc::Receiver<String>,
        snapshots: mpsc::Sender<PageSnapshot>,
        cancel: CancellationToken,
    ) -> Self {
        let jobs = Arc::new(Mutex::new(jobs));
        let handles = (0..workers.max(1))
            .map(|worker| {
                tokio::spawn(probe_worker(
                    worker,
                    fetcher.clone(),
                    base.clone(),
                    state.clone(),
                    jobs.clone(),
                    snapshots.clone(),
                    cancel.clone(),
                ))
            })
            .collect();
        Self { handles }
    }

    /// Wait for every worker to finish.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(err) = handle.await {
                tracing::error!("liveness worker panicked: {err}");
            }
        }
    }
}

async fn probe_worker(
    worker: usize,
    fetcher: Arc<dyn BodyFetcher>,
    base: Url,
    state: Arc<ScanState>,
    jobs: Arc<Mutex<mpsc::Receiver<String>>>,
    snapshots: mpsc::Sender<PageSnapshot>,
    cancel: CancellationToken,
) {
    loop {
        let job = {
            let mut queue = jobs.lock().await;
            tokio::select! {
                // Checked first so a pending job never outruns cancellation.
                biased;
                () = cancel.cancelled() => None,
                job = queue.recv() => job,
            }
        };
        let Some(href) = job else {
            break;
        };

        let target = resolve_against(&base, &href);
        match fetcher.fetch_body(&target).await {
            Ok(_) => state.record_active(target),
            Err(err) => {
                tracing::debug!(worker, url = %target, %err, "liveness probe failed");
                state.record_inactive(target);
            }
        }
        // One snapshot per classification; the receiver may already be
        // gone after cancellation.
        let _ = snapshots.send(state.snapshot()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagelens_fetch::MockFetcher;

    fn base() -> Url {
        Url::parse("https://lucytech.se/").expect("valid base url")
    }

    #[tokio::test]
    async fn test_classifies_reachable_and_unreachable_links() {
        let state = Arc::new(ScanState::default());
        let fetcher =
            Arc::new(MockFetcher::with_body("ok").with_failing_urls(vec!["home24".to_string()]));
        let (job_tx, job_rx) = mpsc::channel(8);
        let (snapshot_tx, mut snapshot_rx) = mpsc::channel(8);

        let pool = LivenessPool::start(
            1,
            fetcher,
            base(),
            state.clone(),
            job_rx,
            snapshot_tx,
            CancellationToken::new(),
        );

        job_tx.send("/contact".to_string()).await.expect("enqueue");
        job_tx
            .send("https://www.home24.de".to_string())
            .await
            .expect("enqueue");
        drop(job_tx);
        pool.join().await;

        let snapshot = state.snapshot();
        assert_eq!(snapshot.active_links.links, vec!["https://lucytech.se/contact"]);
        assert_eq!(snapshot.inactive_links.links, vec!["https://www.home24.de"]);

        // One snapshot per classification.
        assert!(snapshot_rx.recv().await.is_some());
        assert!(snapshot_rx.recv().await.is_some());
        assert!(snapshot_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_cancelled_pool_stops_taking_jobs() {
        let state = Arc::new(ScanState::default());
        let fetcher = Arc::new(MockFetcher::with_body("ok"));
        let (job_tx, job_rx) = mpsc::channel(8);
        let (snapshot_tx, _snapshot_rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();

        cancel.cancel();
        let pool = LivenessPool::start(
            2,
            fetcher.clone(),
            base(),
            state.clone(),
            job_rx,
            snapshot_tx,
            cancel,
        );
        let _ = job_tx.send("/never-probed".to_string()).await;
        pool.join().await;

        let snapshot = state.snapshot();
        assert_eq!(snapshot.active_links.count + snapshot.inactive_links.count, 0);
        assert!(fetcher.requested_urls().is_empty());
    }
}
