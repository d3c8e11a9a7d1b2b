// src/error.rs
// =============================================================================
// Error types for the analysis pipeline.
//
// Every failure that can end an analysis early lives in AnalysisError. The
// analyzer never returns these to its caller directly: it records the
// message and the matching status code on the report instead, so the
// caller always gets a report back.
//
// Status code mapping:
// - input validation problems       -> 400 (no network call is made)
// - network failures / cancellation -> 0
// - non-200 upstream responses      -> the upstream status
// - unreadable page bodies          -> 0
// =============================================================================

use thiserror::Error;

// Reasons an analysis can stop before the document walk begins
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Input was empty after trimming whitespace
    #[error("Invalid URL: URL cannot be empty")]
    EmptyInput,

    /// Input does not look like scheme + host + optional path
    #[error("Invalid URL format: {0}")]
    MalformedUrl(String),

    /// Scheme is something other than http or https
    #[error("Invalid URL: unsupported scheme '{0}', URL must use http:// or https://")]
    UnsupportedScheme(String),

    /// URL parsed but carries no host
    #[error("Invalid URL: URL must contain a host")]
    MissingHost,

    /// Host does not look like a dotted hostname with a real TLD
    #[error("Invalid URL: invalid host format '{0}'")]
    InvalidHost(String),

    /// DNS, connect or timeout failure while fetching the page
    #[error("Failed to fetch URL: {0}")]
    FetchFailed(String),

    /// The page answered, but not with 200 OK
    #[error("HTTP Error: {status} - {reason}")]
    UpstreamHttp { status: u16, reason: String },

    /// The body could not be read into a document
    #[error("Failed to parse HTML: {0}")]
    ParseFailed(String),

    /// The cancellation token fired before the page arrived
    #[error("Failed to fetch URL: analysis cancelled")]
    Cancelled,
}

impl AnalysisError {
    /// Builds the upstream error with the canonical reason phrase for `status`
    pub fn upstream(status: u16) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_string();
        AnalysisError::UpstreamHttp { status, reason }
    }

    /// True for the variants produced by URL validation
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::EmptyInput
                | AnalysisError::MalformedUrl(_)
                | AnalysisError::UnsupportedScheme(_)
                | AnalysisError::MissingHost
                | AnalysisError::InvalidHost(_)
        )
    }

    /// The HTTP status code recorded on the report for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            AnalysisError::UpstreamHttp { status, .. } => *status,
            e if e.is_input_error() => 400,
            _ => 0,
        }
    }
}

// Failures reported by a Transport implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, connect, TLS, timeout)
    #[error("request failed: {0}")]
    Request(String),

    /// A response arrived but its body could not be read
    #[error("could not read response body: {0}")]
    Body(String),
}

// Problems with the analyzer's own setup, raised at construction time
#[derive(Debug, Error)]
pub enum ConfigError {
    /// At least one link checking worker is required
    #[error("worker count must be greater than 0")]
    NoWorkers,

    /// Link queue needs room for at least one URL
    #[error("queue capacity must be greater than 0")]
    ZeroQueueCapacity,

    /// Named timeout was zero
    #[error("{0} must be greater than 0")]
    ZeroTimeout(&'static str),

    /// The reqwest client could not be built
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_map_to_400() {
        assert_eq!(AnalysisError::EmptyInput.status_code(), 400);
        assert_eq!(AnalysisError::MalformedUrl("x".into()).status_code(), 400);
        assert_eq!(AnalysisError::UnsupportedScheme("ftp".into()).status_code(), 400);
        assert_eq!(AnalysisError::MissingHost.status_code(), 400);
        assert_eq!(AnalysisError::InvalidHost("a".into()).status_code(), 400);
    }

    #[test]
    fn test_network_and_parse_errors_map_to_zero() {
        assert_eq!(AnalysisError::FetchFailed("dns".into()).status_code(), 0);
        assert_eq!(AnalysisError::ParseFailed("eof".into()).status_code(), 0);
        assert_eq!(AnalysisError::Cancelled.status_code(), 0);
    }

    #[test]
    fn test_upstream_keeps_status_and_reason() {
        let err = AnalysisError::upstream(404);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "HTTP Error: 404 - Not Found");
    }
}
