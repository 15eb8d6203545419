//! The SSE results endpoint.
//!
//! `GET /api/results?url=<target>` streams one `data:` event per
//! discovered fact. A caller sees zero or more fact snapshots followed by
//! either silent successful completion or one error object. Client
//! disconnects cancel the running scan.

use crate::state::AppState;
use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use pagelens_core::TargetUrl;
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Buffer between the scan forwarder and the SSE body.
const EVENT_BUFFER: usize = 32;

type EventSender = mpsc::Sender<Result<Event, Infallible>>;

#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    #[serde(default)]
    url: String,
}

/// `GET /api/results?url=...`
pub async fn results_handler(
    State(state): State<AppState>,
    Query(query): Query<ResultsQuery>,
) -> Sse<ReceiverStream<Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    tokio::spawn(run_scan(state, query.url, tx));
    Sse::new(ReceiverStream::new(rx)).keep_alive(KeepAlive::default())
}

/// Drive one request: validate, consult the cache, run the scan, and
/// forward its emissions until done or the client goes away.
async fn run_scan(state: AppState, raw_url: String, tx: EventSender) {
    let url = match TargetUrl::parse(&raw_url) {
        Ok(url) => url,
        Err(err) => {
            let _ = tx.send(Ok(error_event(&err.to_string(), Some(400)))).await;
            return;
        }
    };

    if let Some(cached) = state.cache.get(url.as_str()) {
        tracing::debug!(url = url.as_str(), "serving cached result");
        let _ = tx.send(Ok(Event::default().data(cached))).await;
        return;
    }

    let mut session = state.analyzer.start(url.clone());
    let cancel = session.cancellation_token();

    let mut last_body = None;
    loop {
        tokio::select! {
            // The SSE body was dropped: the client is gone.
            () = tx.closed() => {
                tracing::debug!(url = url.as_str(), "client disconnected, cancelling scan");
                cancel.cancel();
                return;
            }
            snapshot = session.snapshots.recv() => {
                let Some(snapshot) = snapshot else { break };
                let body = match serde_json::to_string(&snapshot) {
                    Ok(body) => body,
                    Err(err) => {
                        tracing::error!(%err, "failed to serialize snapshot");
                        continue;
                    }
                };
                last_body = Some(body.clone());
                if tx.send(Ok(Event::default().data(body))).await.is_err() {
                    cancel.cancel();
                    return;
                }
            }
        }
    }

    match session.outcome.await {
        Ok(Ok(())) => {
            if let Some(body) = last_body {
                state.cache.insert(url.as_str(), body);
            }
        }
        Ok(Err(err)) => {
            let _ = tx
                .send(Ok(error_event(&err.to_string(), Some(err.status_code()))))
                .await;
        }
        Err(_) => {
            tracing::error!(url = url.as_str(), "scan ended without reporting an outcome");
        }
    }
}

/// One error object in the documented wire format.
fn error_event(message: &str, status_code: Option<u16>) -> Event {
    Event::default().data(error_body(message, status_code))
}

fn error_body(message: &str, status_code: Option<u16>) -> String {
    let body = match status_code {
        Some(code) => json!({ "error": message, "status_code": code.to_string() }),
        None => json!({ "error": message }),
    };
    body.to_string()
}
