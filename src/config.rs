// src/config.rs
// =============================================================================
// Analyzer configuration.
//
// All the knobs of an analysis run (worker count, queue size, timeouts,
// client identity) live in one AnalyzerConfig value that is handed to
// PageAnalyzer::new. Nothing here is global: two analyzers in the same
// process can run with different settings.
// =============================================================================

use std::time::Duration;

use crate::error::ConfigError;

/// Workers checking external links in parallel
pub const DEFAULT_WORKERS: usize = 10;
/// Capacity of the external-link queue and of the results queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;
/// Timeout for the GET of the analyzed page
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
/// Timeout for each HEAD request against an external link
pub const DEFAULT_LINK_TIMEOUT: Duration = Duration::from_secs(10);
/// Deadline for a whole analysis, fetch and link checks included
pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(60);
/// Identifier sent in the User-Agent header
pub const DEFAULT_USER_AGENT: &str = "WebPageAnalyzer/1.0";
/// Idle connections kept per host in the client pool
pub const DEFAULT_MAX_IDLE_PER_HOST: usize = 10;
/// How long an idle pooled connection is kept around
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub num_workers: usize,
    pub queue_capacity: usize,
    pub fetch_timeout: Duration,
    pub link_timeout: Duration,
    pub analysis_timeout: Duration,
    pub user_agent: String,
    pub max_idle_per_host: usize,
    pub idle_timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            num_workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            link_timeout: DEFAULT_LINK_TIMEOUT,
            analysis_timeout: DEFAULT_ANALYSIS_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_idle_per_host: DEFAULT_MAX_IDLE_PER_HOST,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

impl AnalyzerConfig {
    // Rejects settings the pipeline cannot run with
    //
    // A zero worker count would leave the link queue without consumers,
    // and a zero capacity channel cannot be created by tokio at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        let timeouts = [
            ("fetch timeout", self.fetch_timeout),
            ("link timeout", self.link_timeout),
            ("analysis timeout", self.analysis_timeout),
        ];
        for (name, value) in timeouts {
            if value.is_zero() {
                return Err(ConfigError::ZeroTimeout(name));
            }
        }
        Ok(())
    }
}
