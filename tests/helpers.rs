//! Shared fixtures for the integration tests.
//!
//! `FakeTransport` serves pages and HEAD statuses from in-memory tables,
//! counting every request so tests can assert on network usage.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use page_analyzer::{AnalyzerConfig, PageAnalyzer, PageResponse, Transport, TransportError};

#[derive(Default)]
pub struct FakeTransport {
    pages: Mutex<HashMap<String, Result<PageResponse, TransportError>>>,
    heads: Mutex<HashMap<String, u16>>,
    head_delay: Mutex<Duration>,
    pub get_calls: AtomicUsize,
    pub head_calls: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn page(&self, url: &str, status: u16, body: &str) {
        self.pages.lock().unwrap().insert(
            url.to_string(),
            Ok(PageResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    pub fn page_error(&self, url: &str, error: TransportError) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(error));
    }

    pub fn head(&self, url: &str, status: u16) {
        self.heads.lock().unwrap().insert(url.to_string(), status);
    }

    pub fn set_head_delay(&self, delay: Duration) {
        *self.head_delay.lock().unwrap() = delay;
    }

    pub fn network_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst) + self.head_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<PageResponse, TransportError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(TransportError::Request("dns error: no such host".into())))
    }

    async fn head(&self, url: &str, _timeout: Duration) -> Result<u16, TransportError> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.head_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.heads
            .lock()
            .unwrap()
            .get(url)
            .copied()
            .ok_or_else(|| TransportError::Request("connection refused".into()))
    }
}

pub fn test_config(workers: usize) -> AnalyzerConfig {
    AnalyzerConfig {
        num_workers: workers,
        link_timeout: Duration::from_secs(2),
        fetch_timeout: Duration::from_secs(2),
        analysis_timeout: Duration::from_secs(10),
        ..AnalyzerConfig::default()
    }
}

pub fn analyzer(transport: &Arc<FakeTransport>, config: AnalyzerConfig) -> PageAnalyzer {
    PageAnalyzer::with_transport(config, transport.clone()).expect("valid test config")
}

/// Builds a page with `n` external links to https://ext{i}.test/
pub fn page_with_external_links(n: usize) -> String {
    let links: String = (0..n)
        .map(|i| format!(r#"<a href="https://ext{}.test/">link {}</a>"#, i, i))
        .collect();
    format!("<!DOCTYPE html><html><body>{}</body></html>", links)
}
