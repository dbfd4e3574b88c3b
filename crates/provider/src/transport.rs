//! HTTP transport
//!
//! The translator talks to the remote API through the [`Transport`] trait so
//! that tests and embedders can substitute their own client. The default
//! [`ReqwestTransport`] adds a request timeout and retries idempotent
//! requests with jittered exponential backoff.

use crate::error::{ProviderError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP verbs used by the translator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Whether repeating the request cannot create or change anything twice
    pub fn is_idempotent(&self) -> bool {
        matches!(self, Method::Get | Method::Delete)
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to the remote API
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,

    /// JSON body, sent with `Content-Type: application/json`
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A response from the remote API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the remote API
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    /// Perform a single logical request
    ///
    /// Any HTTP status is a successful round trip. Errors are reserved for
    /// requests that never produced a response.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Per-attempt request timeout in seconds
    pub timeout_secs: u64,

    /// Retries after the first attempt (GET and DELETE only)
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds
    pub initial_backoff_ms: u64,

    /// Upper bound for a single delay in milliseconds
    pub max_backoff_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
            initial_backoff_ms: 200,
            max_backoff_ms: 5_000,
        }
    }
}

/// Bounded retries with jittered exponential backoff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Whether a request may be attempted again after `attempt` retries
    pub fn allows(&self, method: Method, attempt: u32) -> bool {
        method.is_idempotent() && attempt < self.max_retries
    }

    /// Delay before retry number `attempt` (zero-based)
    ///
    /// Picks a random delay between half and all of the exponential step.
    pub fn delay(&self, attempt: u32) -> Duration {
        let step = self
            .initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_backoff);
        let millis = step.as_millis() as u64;
        if millis == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(millis / 2..=millis))
    }
}

impl From<&TransportConfig> for RetryPolicy {
    fn from(config: &TransportConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }
}

/// Default transport on a blocking reqwest client
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
    retry: RetryPolicy,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            retry: RetryPolicy::from(config),
        })
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn send_once(&self, request: &HttpRequest) -> reqwest::Result<HttpResponse> {
        let mut builder = self
            .client
            .request(request.method.to_reqwest(), &request.url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut attempt = 0;
        loop {
            let outcome = self.send_once(request);
            let retryable = match &outcome {
                Ok(response) => response.status >= 500,
                Err(e) => e.is_connect() || e.is_timeout(),
            };

            if retryable && self.retry.allows(request.method, attempt) {
                let delay = self.retry.delay(attempt);
                attempt += 1;
                warn!(
                    method = %request.method,
                    url = %request.url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying request"
                );
                thread::sleep(delay);
                continue;
            }

            return match outcome {
                Ok(response) => {
                    debug!(
                        method = %request.method,
                        url = %request.url,
                        status = response.status,
                        "request completed"
                    );
                    Ok(response)
                }
                Err(e) => Err(ProviderError::Transport(format!(
                    "{} {}: {}",
                    request.method, request.url, e
                ))),
            };
        }
    }
}
