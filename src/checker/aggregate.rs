// src/checker/aggregate.rs
// =============================================================================
// Folds link check results into the final report.
//
// The aggregator is the only code that writes `inaccessible_links`. It
// drains the results queue until the link workers have all exited and
// the queue closes, so once `drain` returns every link check of the run
// is accounted for.
// =============================================================================

use tokio::sync::mpsc;

use super::html::WalkOutput;
use super::http::LinkCheckResult;
use crate::models::AnalysisResult;

// Running totals over the results queue
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkTally {
    pub checked: usize,
    pub unreachable: usize,
}

impl LinkTally {
    pub fn record(&mut self, result: &LinkCheckResult) {
        self.checked += 1;
        if !result.reachable {
            self.unreachable += 1;
        }
    }
}

// Consumes results until the queue is closed and empty
pub async fn drain(mut results: mpsc::Receiver<LinkCheckResult>) -> LinkTally {
    let mut tally = LinkTally::default();
    while let Some(result) = results.recv().await {
        tally.record(&result);
    }
    tally
}

// Produces the finished report from the walk and the link tally
//
// Hrefs the walk could not resolve count as inaccessible alongside the
// links that failed their reachability check.
pub fn merge(walk: WalkOutput, tally: LinkTally) -> AnalysisResult {
    let mut result = walk.result;
    result.inaccessible_links = walk.unresolvable_links + tally.unreachable;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(url: &str, reachable: bool) -> LinkCheckResult {
        LinkCheckResult {
            url: url.to_string(),
            reachable,
            status_code: reachable.then_some(200),
            error: None,
        }
    }

    #[tokio::test]
    async fn test_drain_counts_unreachable() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(check("https://a.test/", true)).await.unwrap();
        tx.send(check("https://b.test/", false)).await.unwrap();
        tx.send(check("https://c.test/", false)).await.unwrap();
        drop(tx);

        let tally = drain(rx).await;
        assert_eq!(tally, LinkTally { checked: 3, unreachable: 2 });
    }

    #[tokio::test]
    async fn test_drain_waits_for_late_results() {
        let (tx, rx) = mpsc::channel(1);
        let producer = tokio::spawn(async move {
            for i in 0..5 {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                tx.send(check(&format!("https://{}.test/", i), i % 2 == 0))
                    .await
                    .unwrap();
            }
        });

        let tally = drain(rx).await;
        producer.await.unwrap();
        assert_eq!(tally.checked, 5);
        assert_eq!(tally.unreachable, 2);
    }

    #[test]
    fn test_merge_adds_unresolvable_links() {
        let mut result = AnalysisResult::new("https://example.com/");
        result.external_links = 4;
        let walk = WalkOutput {
            result,
            unresolvable_links: 1,
            queued_links: 4,
            dropped_links: 0,
        };
        let merged = merge(walk, LinkTally { checked: 4, unreachable: 2 });
        assert_eq!(merged.inaccessible_links, 3);
        assert_eq!(merged.external_links, 4);
    }
}
