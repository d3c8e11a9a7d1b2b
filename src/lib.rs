// src/lib.rs
// =============================================================================
// page_analyzer: fetch one web page, describe its structure, and check
// whether its outbound links are reachable.
//
// Entry point: PageAnalyzer::analyze(url) -> AnalysisResult
//
// Modules:
// - validator: user input -> well-formed absolute URL
// - fetch: HTTP transport seam and the page GET
// - checker: document walk, form analysis, link workers, aggregation
// - analyzer: wires the pieces into one pipeline
// - models: the report and its parts
// - config / error / logging: settings, error types, tracing setup
// =============================================================================

pub mod analyzer;
pub mod checker;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod models;
pub mod validator;

pub use analyzer::PageAnalyzer;
pub use config::AnalyzerConfig;
pub use error::{AnalysisError, ConfigError, TransportError};
pub use fetch::{HttpTransport, PageResponse, Transport};
pub use models::AnalysisResult;
