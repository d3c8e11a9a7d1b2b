// src/checker/http.rs
// =============================================================================
// This module checks whether external links are reachable.
//
// Key functionality:
// - Makes HTTP HEAD requests (lightweight, no body download)
// - A fixed number of workers pull URLs from one bounded queue
// - Every processed URL produces exactly one LinkCheckResult
//
// Shutdown happens in a strict order so nothing is lost and nothing hangs:
// 1. The document walk drops its sender, closing the link queue
// 2. Each worker leaves its loop once the queue is closed and empty
// 3. A supervisor task waits for every worker, then drops the last
//    results sender, closing the results queue
// 4. The aggregator drains results until the queue reports closed
//
// Reachable means "HEAD answered 200 in time". Any other status, any
// transport error and any timeout all count the same: unreachable.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::AnalyzerConfig;
use crate::fetch::{remaining, Transport};

// Outcome of checking one link
//
// Only the aggregator looks at these, and only at `reachable`; the other
// fields exist for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCheckResult {
    /// The URL that was checked
    pub url: String,
    /// HEAD returned 200 within the timeout
    pub reachable: bool,
    /// Status code, when a response arrived at all
    pub status_code: Option<u16>,
    /// Why the link is unreachable
    pub error: Option<String>,
}

impl LinkCheckResult {
    fn from_status(url: String, status: u16) -> Self {
        let reachable = status == 200;
        Self {
            url,
            reachable,
            status_code: Some(status),
            error: (!reachable).then(|| format!("HTTP {}", status)),
        }
    }

    fn failed(url: String, error: impl Into<String>) -> Self {
        Self {
            url,
            reachable: false,
            status_code: None,
            error: Some(error.into()),
        }
    }
}

// A fixed-size set of link checking workers
//
// The pool itself is cheap: it only holds the shared transport and the
// settings. `start` spawns the workers for one analysis.
#[derive(Clone)]
pub struct LinkPool {
    transport: Arc<dyn Transport>,
    workers: usize,
    link_timeout: Duration,
    results_capacity: usize,
}

impl LinkPool {
    pub fn new(transport: Arc<dyn Transport>, config: &AnalyzerConfig) -> Self {
        Self {
            transport,
            workers: config.num_workers.max(1),
            link_timeout: config.link_timeout,
            results_capacity: config.queue_capacity.max(1),
        }
    }

    // Spawns the workers and their supervisor, returns the results queue
    //
    // Workers stop pulling new links once `cancel` fires or `deadline`
    // passes. Links still sitting in the queue at that point are never
    // checked and never reported.
    pub fn start(
        &self,
        links: mpsc::Receiver<String>,
        deadline: Instant,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<LinkCheckResult> {
        let (results_tx, results_rx) = mpsc::channel(self.results_capacity);
        let links = Arc::new(Mutex::new(links));

        let handles: Vec<JoinHandle<usize>> = (0..self.workers)
            .map(|id| {
                let worker = Worker {
                    id,
                    transport: Arc::clone(&self.transport),
                    links: Arc::clone(&links),
                    results: results_tx.clone(),
                    link_timeout: self.link_timeout,
                    deadline,
                    cancel: cancel.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        tokio::spawn(supervise(handles, results_tx));

        results_rx
    }
}

// Waits for all workers, then closes the results queue
async fn supervise(handles: Vec<JoinHandle<usize>>, results: mpsc::Sender<LinkCheckResult>) {
    let mut checked = 0;
    for outcome in join_all(handles).await {
        match outcome {
            Ok(count) => checked += count,
            Err(e) => warn!(error = %e, "link checker worker failed"),
        }
    }
    debug!(checked, "all link checkers finished");
    drop(results);
}

struct Worker {
    id: usize,
    transport: Arc<dyn Transport>,
    links: Arc<Mutex<mpsc::Receiver<String>>>,
    results: mpsc::Sender<LinkCheckResult>,
    link_timeout: Duration,
    deadline: Instant,
    cancel: CancellationToken,
}

impl Worker {
    // Pulls and checks links until the queue is closed and drained
    //
    // Returns how many links this worker checked.
    async fn run(self) -> usize {
        let mut checked = 0;

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            let next = {
                let mut links = self.links.lock().await;
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => None,
                    _ = tokio::time::sleep_until(self.deadline) => None,
                    link = links.recv() => link,
                }
            };
            let Some(url) = next else { break };

            let result = check_link(
                self.transport.as_ref(),
                url,
                self.link_timeout,
                self.deadline,
                &self.cancel,
            )
            .await;
            debug!(
                worker = self.id,
                url = %result.url,
                reachable = result.reachable,
                status = ?result.status_code,
                "link checked"
            );
            checked += 1;

            if self.results.send(result).await.is_err() {
                break;
            }
        }

        checked
    }
}

// Checks a single link with a HEAD request
//
// The request gets the shorter of `timeout` and the time left before the
// analysis deadline. A request interrupted by cancellation is reported as
// unreachable, like any other request that did not finish.
pub async fn check_link(
    transport: &dyn Transport,
    url: String,
    timeout: Duration,
    deadline: Instant,
    cancel: &CancellationToken,
) -> LinkCheckResult {
    let budget = remaining(timeout, deadline);
    if budget.is_zero() {
        return LinkCheckResult::failed(url, "analysis deadline exceeded");
    }

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => return LinkCheckResult::failed(url, "analysis cancelled"),
        outcome = tokio::time::timeout(budget, transport.head(&url, budget)) => outcome,
    };

    match outcome {
        Err(_elapsed) => LinkCheckResult::failed(url, "request timed out"),
        Ok(Err(e)) => LinkCheckResult::failed(url, e.to_string()),
        Ok(Ok(status)) => LinkCheckResult::from_status(url, status),
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a Mutex around the receiver?
//    - tokio's mpsc has one consumer; we want several
//    - Whoever holds the lock waits on recv(), the others wait on the lock
//    - The lock is released before the HEAD request, so checks still run
//      in parallel
//
// 2. Why does the supervisor own a results sender?
//    - The results queue closes when the last sender is dropped
//    - Workers drop theirs as they exit; the supervisor drops the last one
//      only after join_all, so the close always comes after the final
//      result
//
// 3. Why Arc<dyn Transport>?
//    - All workers share one connection pool
//    - Arc::clone just bumps a reference count
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::fetch::PageResponse;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // HEAD answers from a fixed table; unknown URLs fail to connect
    struct TableTransport {
        statuses: HashMap<String, u16>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl TableTransport {
        fn new(entries: &[(&str, u16)]) -> Self {
            Self {
                statuses: entries.iter().map(|(u, s)| (u.to_string(), *s)).collect(),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Transport for TableTransport {
        async fn get(&self, _url: &str, _timeout: Duration) -> Result<PageResponse, TransportError> {
            Err(TransportError::Request("not used".into()))
        }

        async fn head(&self, url: &str, _timeout: Duration) -> Result<u16, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.statuses
                .get(url)
                .copied()
                .ok_or_else(|| TransportError::Request("connection refused".into()))
        }
    }

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(60)
    }

    #[tokio::test]
    async fn test_status_200_is_reachable() {
        let transport = TableTransport::new(&[("https://a.test/", 200)]);
        let result = check_link(
            &transport,
            "https://a.test/".into(),
            Duration::from_secs(1),
            far_deadline(),
            &CancellationToken::new(),
        )
        .await;
        assert!(result.reachable);
        assert_eq!(result.status_code, Some(200));
        assert_eq!(result.error, None);
    }

    #[tokio::test]
    async fn test_non_200_and_errors_are_unreachable() {
        let transport = TableTransport::new(&[("https://a.test/", 301), ("https://b.test/", 404)]);
        for url in ["https://a.test/", "https://b.test/", "https://down.test/"] {
            let result = check_link(
                &transport,
                url.into(),
                Duration::from_secs(1),
                far_deadline(),
                &CancellationToken::new(),
            )
            .await;
            assert!(!result.reachable, "{} should be unreachable", url);
            assert!(result.error.is_some());
        }
    }

    #[tokio::test]
    async fn test_slow_link_times_out() {
        let mut transport = TableTransport::new(&[("https://slow.test/", 200)]);
        transport.delay = Duration::from_millis(500);
        let result = check_link(
            &transport,
            "https://slow.test/".into(),
            Duration::from_millis(20),
            far_deadline(),
            &CancellationToken::new(),
        )
        .await;
        assert!(!result.reachable);
        assert_eq!(result.error.as_deref(), Some("request timed out"));
    }

    #[tokio::test]
    async fn test_pool_reports_every_queued_link() {
        let transport = Arc::new(TableTransport::new(&[
            ("https://a.test/", 200),
            ("https://b.test/", 404),
            ("https://c.test/", 200),
        ]));
        let config = AnalyzerConfig {
            num_workers: 2,
            ..AnalyzerConfig::default()
        };
        let pool = LinkPool::new(transport.clone(), &config);

        let (tx, rx) = mpsc::channel(10);
        for url in ["https://a.test/", "https://b.test/", "https://c.test/", "https://d.test/"] {
            tx.try_send(url.to_string()).unwrap();
        }
        drop(tx);

        let mut results = pool.start(rx, far_deadline(), CancellationToken::new());
        let mut seen = Vec::new();
        while let Some(result) = results.recv().await {
            seen.push(result);
        }

        assert_eq!(seen.len(), 4);
        assert_eq!(seen.iter().filter(|r| r.reachable).count(), 2);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_cancelled_pool_checks_nothing() {
        let transport = Arc::new(TableTransport::new(&[("https://a.test/", 200)]));
        let pool = LinkPool::new(transport.clone(), &AnalyzerConfig::default());

        let (tx, rx) = mpsc::channel(10);
        tx.try_send("https://a.test/".to_string()).unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut results = pool.start(rx, far_deadline(), cancel);

        // The sender is still alive, so only cancellation can end this
        assert!(results.recv().await.is_none());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        drop(tx);
    }
}
