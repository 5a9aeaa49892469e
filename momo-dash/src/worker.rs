//! Debounced fetch worker
//!
//! Sits between the filter form and the API client. Bursts of apply events
//! inside the quiet window collapse into a single fetch carrying the last
//! submitted criteria. An already-issued request is never aborted: if a
//! stale response lands after a newer one it simply overwrites the view
//! (last-resolved-wins), which is the contract the dashboard has always had
//! with the API.

use std::future::Future;
use std::time::Duration;

use momo_core::{FilterCriteria, Transaction};
use tokio::sync::mpsc;

use crate::client::{ApiClient, FetchError};

/// A filter submission from the dashboard
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub request_id: u64,
    pub criteria: FilterCriteria,
}

/// Worker-to-dashboard events
#[derive(Debug, Clone)]
pub enum FetchEvent {
    Started { request_id: u64 },
    Loaded { request_id: u64, records: Vec<Transaction> },
    Failed { request_id: u64, message: String },
}

/// Run the worker against the real API client
pub async fn run_worker(
    client: ApiClient,
    rx: mpsc::UnboundedReceiver<FetchRequest>,
    tx: std::sync::mpsc::Sender<FetchEvent>,
    debounce: Duration,
) {
    run_worker_with(rx, tx, debounce, move |criteria| {
        let client = client.clone();
        async move { client.fetch_transactions(&criteria).await }
    })
    .await;
}

/// Worker loop, generic over the fetch call so the debounce contract is
/// testable without a server.
pub async fn run_worker_with<F, Fut>(
    mut rx: mpsc::UnboundedReceiver<FetchRequest>,
    tx: std::sync::mpsc::Sender<FetchEvent>,
    debounce: Duration,
    fetch: F,
) where
    F: Fn(FilterCriteria) -> Fut,
    Fut: Future<Output = Result<Vec<Transaction>, FetchError>> + Send + 'static,
{
    while let Some(mut req) = rx.recv().await {
        // Trailing-edge debounce: newer submissions replace the pending one
        // until the window stays quiet. Nothing is fetched for the
        // intermediate states.
        loop {
            match tokio::time::timeout(debounce, rx.recv()).await {
                Ok(Some(newer)) => req = newer,
                Ok(None) => return,
                Err(_) => break,
            }
        }

        let request_id = req.request_id;
        let _ = tx.send(FetchEvent::Started { request_id });

        let tx2 = tx.clone();
        let fut = fetch(req.criteria);
        tokio::spawn(async move {
            match fut.await {
                Ok(records) => {
                    let _ = tx2.send(FetchEvent::Loaded { request_id, records });
                }
                Err(e) => {
                    tracing::warn!("fetch {request_id} failed: {e}");
                    let _ = tx2.send(FetchEvent::Failed {
                        request_id,
                        message: e.to_string(),
                    });
                }
            }
        });
    }
}
