// src/fetch/page.rs
// =============================================================================
// Fetches the page being analyzed.
//
// The GET is bounded twice: by the fetch timeout and by whatever is left of
// the analysis deadline, whichever is shorter. It also gives up as soon as
// the cancellation token fires.
//
// Outcome mapping:
// - transport request failure or timeout -> FetchFailed   (status 0)
// - token cancelled                      -> Cancelled     (status 0)
// - any status other than 200            -> UpstreamHttp  (that status)
// - body could not be read               -> ParseFailed   (status 0)
// =============================================================================

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::transport::{PageResponse, Transport};
use crate::error::{AnalysisError, TransportError};

pub async fn fetch_page(
    transport: &dyn Transport,
    url: &str,
    timeout: Duration,
    deadline: Instant,
    cancel: &CancellationToken,
) -> Result<PageResponse, AnalysisError> {
    let budget = remaining(timeout, deadline);
    if budget.is_zero() {
        return Err(AnalysisError::FetchFailed("request timed out".to_string()));
    }

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(AnalysisError::Cancelled),
        outcome = tokio::time::timeout(budget, transport.get(url, budget)) => outcome,
    };

    let page = match outcome {
        Err(_elapsed) => {
            warn!(url, "page fetch timed out");
            return Err(AnalysisError::FetchFailed("request timed out".to_string()));
        }
        Ok(Err(TransportError::Request(message))) => {
            warn!(url, error = %message, "page fetch failed");
            return Err(AnalysisError::FetchFailed(message));
        }
        Ok(Err(TransportError::Body(message))) => {
            return Err(AnalysisError::ParseFailed(message));
        }
        Ok(Ok(page)) => page,
    };

    if page.status != 200 {
        warn!(url, status = page.status, "page returned a non-200 status");
        return Err(AnalysisError::upstream(page.status));
    }

    Ok(page)
}

// Shorter of `timeout` and the time left before `deadline`
pub(crate) fn remaining(timeout: Duration, deadline: Instant) -> Duration {
    timeout.min(deadline.saturating_duration_since(Instant::now()))
}
