// src/fetch/transport.rs
// =============================================================================
// The HTTP seam of the analyzer.
//
// The pipeline only needs two things from an HTTP client: a GET for the
// page itself and a HEAD per external link, both with a timeout and an
// identifying User-Agent. The Transport trait captures exactly that, so
// the rest of the crate never touches reqwest directly and tests can swap
// in an in-memory transport.
//
// HttpTransport is the real implementation. It owns one reqwest::Client,
// and with it one connection pool, for the lifetime of the analyzer.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::config::AnalyzerConfig;
use crate::error::{ConfigError, TransportError};

// What a GET of the analyzed page produced
//
// `body` is only read for 200 responses; for any other status it is empty
// because the caller discards the page anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url`, reading the body when the status is 200
    async fn get(&self, url: &str, timeout: Duration) -> Result<PageResponse, TransportError>;

    /// HEAD `url`, returning only the status code
    async fn head(&self, url: &str, timeout: Duration) -> Result<u16, TransportError>;
}

// reqwest-backed transport with a pooled client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    // Builds the pooled client from the analyzer settings
    //
    // The client-level timeout is the page fetch timeout; HEAD requests
    // override it per request with the shorter link timeout.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.fetch_timeout)
            .pool_max_idle_per_host(config.max_idle_per_host)
            .pool_idle_timeout(config.idle_timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<PageResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(describe_request_error)?;

        let status = response.status();
        let body = if status == StatusCode::OK {
            response
                .text()
                .await
                .map_err(|e| TransportError::Body(e.to_string()))?
        } else {
            String::new()
        };

        Ok(PageResponse {
            status: status.as_u16(),
            body,
        })
    }

    async fn head(&self, url: &str, timeout: Duration) -> Result<u16, TransportError> {
        let response = self
            .client
            .head(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(describe_request_error)?;
        Ok(response.status().as_u16())
    }
}

// Gives reqwest errors a short, stable description
fn describe_request_error(error: reqwest::Error) -> TransportError {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    };
    TransportError::Request(message)
}
