//! HTTP transport seam.
//!
//! Providers talk to the network only through `HttpTransport`, so retry
//! behavior can be driven by scripted transports in tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::types::{DocgenError, Result};

/// Status and raw body of a completed exchange
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure before any HTTP status was received
#[derive(Debug, Clone)]
pub struct TransportError {
    pub message: String,
    pub timed_out: bool,
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
    ) -> std::result::Result<HttpReply, TransportError>;
}

/// `reqwest`-backed transport; one pooled client shared by all requests
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client, routing all traffic through `proxy` when given.
    pub fn new(connect_timeout: Duration, proxy: Option<&str>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().connect_timeout(connect_timeout);

        if let Some(proxy_url) = proxy.filter(|p| !p.trim().is_empty()) {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                DocgenError::Settings(format!("Invalid proxy '{}': {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| DocgenError::Settings(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
    ) -> std::result::Result<HttpReply, TransportError> {
        let mut request = self.client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| TransportError {
            message: format!("request failed: {}", e),
            timed_out: e.is_timeout(),
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| TransportError {
            message: format!("failed to read response body: {}", e),
            timed_out: e.is_timeout(),
        })?;

        Ok(HttpReply { status, body })
    }
}

/// One request seen by a `ScriptedTransport`
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl RecordedRequest {
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

/// Replays canned replies in order and records every request
///
/// Once the script runs out, every further request fails at the transport
/// level.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<std::result::Result<HttpReply, TransportError>>>,
    delays: Mutex<VecDeque<Duration>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<std::result::Result<HttpReply, TransportError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    /// Per-request latency, consumed in order (missing entries mean none).
    pub fn with_delays(self, delays: Vec<Duration>) -> Self {
        if let Ok(mut queue) = self.delays.lock() {
            *queue = delays.into();
        }
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
    ) -> std::result::Result<HttpReply, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                url: url.to_string(),
                headers: headers.to_vec(),
                body: body.clone(),
            });
        }

        let reply = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());
        let delay = self
            .delays
            .lock()
            .ok()
            .and_then(|mut delays| delays.pop_front());

        if let Some(delay) = delay.filter(|d| !d.is_zero()) {
            tokio::time::sleep(delay).await;
        }

        reply.unwrap_or_else(|| {
            Err(TransportError {
                message: "no scripted reply left".to_string(),
                timed_out: false,
            })
        })
    }
}
