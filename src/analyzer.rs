// src/analyzer.rs
// =============================================================================
// The analysis pipeline end to end.
//
//   validate -> fetch -> { document walk  ==link queue==>  link workers }
//                                                              |
//                                    aggregator <==results queue
//
// The document walk runs on a blocking thread (parsing and walking are
// pure CPU work) while the link workers run as tokio tasks, so the two
// make progress at the same time. The aggregator drains results on the
// calling task until the results queue closes.
//
// `analyze` never fails: every error ends up in the report's `error` and
// `http_status_code` fields.
// =============================================================================

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::checker::{self, LinkPool};
use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, ConfigError};
use crate::fetch::{fetch_page, HttpTransport, Transport};
use crate::models::AnalysisResult;
use crate::validator;

#[derive(Clone)]
pub struct PageAnalyzer {
    config: AnalyzerConfig,
    transport: Arc<dyn Transport>,
}

impl PageAnalyzer {
    // Builds an analyzer backed by a pooled reqwest client
    pub fn new(config: AnalyzerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self {
            config,
            transport: Arc::new(transport),
        })
    }

    // Builds an analyzer over any Transport (tests use an in-memory one)
    pub fn with_transport(
        config: AnalyzerConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes `raw_url` with no external cancellation
    pub async fn analyze(&self, raw_url: &str) -> AnalysisResult {
        self.analyze_with_cancel(raw_url, CancellationToken::new())
            .await
    }

    /// Analyzes `raw_url`, stopping early when `cancel` fires
    ///
    /// The configured analysis timeout acts as a second, built-in
    /// deadline on top of the token.
    pub async fn analyze_with_cancel(
        &self,
        raw_url: &str,
        cancel: CancellationToken,
    ) -> AnalysisResult {
        let started = std::time::Instant::now();

        let mut result = match self.run(raw_url, &cancel).await {
            Ok(result) => result,
            Err(err) => {
                warn!(url = raw_url, status = err.status_code(), error = %err, "analysis failed");
                let mut result = AnalysisResult::new(raw_url);
                result.fail(&err);
                result
            }
        };
        result.analysis_time = started.elapsed();

        if result.is_successful() {
            info!(
                url = %result.url,
                duration = ?result.analysis_time,
                internal_links = result.internal_links,
                external_links = result.external_links,
                inaccessible_links = result.inaccessible_links,
                "page analysis completed"
            );
        }
        result
    }

    async fn run(
        &self,
        raw_url: &str,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResult, AnalysisError> {
        let deadline = Instant::now() + self.config.analysis_timeout;

        let url = validator::validate(raw_url)?;
        let base = Url::parse(&url).map_err(|_| AnalysisError::MalformedUrl(url.clone()))?;
        info!(url = %url, "analyzing page");

        let page = fetch_page(
            self.transport.as_ref(),
            &url,
            self.config.fetch_timeout,
            deadline,
            cancel,
        )
        .await?;

        let (link_tx, link_rx) = mpsc::channel(self.config.queue_capacity);
        let pool = LinkPool::new(Arc::clone(&self.transport), &self.config);
        let results = pool.start(link_rx, deadline, cancel.clone());

        let report = AnalysisResult::new(&url);
        let walk = tokio::task::spawn_blocking(move || {
            checker::analyze_document(&page.body, &base, report, link_tx)
        });

        let (walk, tally) = tokio::join!(walk, checker::drain(results));
        let walk = walk.map_err(|e| {
            AnalysisError::ParseFailed(format!("document analysis aborted: {}", e))
        })?;

        debug!(
            url = %url,
            queued = walk.queued_links,
            checked = tally.checked,
            unreachable = tally.unreachable,
            unresolvable = walk.unresolvable_links,
            "link checks finished"
        );
        if walk.dropped_links > 0 {
            warn!(
                url = %url,
                dropped = walk.dropped_links,
                "some external links were not checked"
            );
        }

        Ok(checker::merge(walk, tally))
    }
}
