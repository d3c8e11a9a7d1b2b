// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things). Every tuning flag can
// also come from an environment variable, so the same binary can be
// configured from a shell profile or a container environment.
// =============================================================================

use std::time::Duration;

use clap::Parser;

use page_analyzer::config::{
    AnalyzerConfig, DEFAULT_ANALYSIS_TIMEOUT, DEFAULT_FETCH_TIMEOUT, DEFAULT_LINK_TIMEOUT,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_USER_AGENT, DEFAULT_WORKERS,
};
use page_analyzer::logging::LogFormat;

#[derive(Parser, Debug)]
#[command(
    name = "page-analyzer",
    version = "0.1.0",
    about = "Analyze the structure of a web page and check its outbound links",
    long_about = "page-analyzer fetches a single web page and reports its HTML version, title, \
                  headings, forms, images, scripts, stylesheets, text statistics and \
                  accessibility signals, plus how many of its links are internal, external \
                  and unreachable."
)]
pub struct Cli {
    /// URL of the page to analyze (https:// is assumed when missing)
    pub url: String,

    /// Print the full report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Number of workers checking external links in parallel
    #[arg(long, env = "PAGE_ANALYZER_WORKERS", default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Capacity of the external-link queue; links beyond it are not checked
    #[arg(long, env = "PAGE_ANALYZER_QUEUE_CAPACITY", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Seconds allowed for fetching the page
    #[arg(long, env = "PAGE_ANALYZER_FETCH_TIMEOUT", default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs())]
    pub fetch_timeout: u64,

    /// Seconds allowed for each link check
    #[arg(long, env = "PAGE_ANALYZER_LINK_TIMEOUT", default_value_t = DEFAULT_LINK_TIMEOUT.as_secs())]
    pub link_timeout: u64,

    /// Seconds allowed for the whole analysis
    #[arg(long, env = "PAGE_ANALYZER_TIMEOUT", default_value_t = DEFAULT_ANALYSIS_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// User-Agent sent with every request
    #[arg(long, env = "PAGE_ANALYZER_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "PAGE_ANALYZER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            num_workers: self.workers,
            queue_capacity: self.queue_capacity,
            fetch_timeout: Duration::from_secs(self.fetch_timeout),
            link_timeout: Duration::from_secs(self.link_timeout),
            analysis_timeout: Duration::from_secs(self.timeout),
            user_agent: self.user_agent.clone(),
            ..AnalyzerConfig::default()
        }
    }
}
