// src/logging.rs
// =============================================================================
// Installs the tracing subscriber used by the binary.
//
// RUST_LOG takes precedence when set; otherwise the level given on the
// command line applies. Output goes to stderr so that --json reports on
// stdout stay machine-readable.
// =============================================================================

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

// Builds the filter: RUST_LOG if present and valid, else `level`
//
// html5ever is chatty about recoverable markup errors, so it is capped at
// error unless RUST_LOG says otherwise.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},html5ever=error,selectors=warn", level)))
}

pub fn init_logging(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))
}
