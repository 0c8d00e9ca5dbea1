//! HTTP client with retry and rate limiting
//!
//! Every request is an authenticated GET returning a JSON body. Failures
//! are classified before deciding whether to try again:
//! - transport errors, timeouts and 5xx responses are transient and retried
//!   with backoff until the attempt budget is spent
//! - 4xx responses are permanent and returned immediately

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Media type requested from the Airship API
pub const AIRSHIP_ACCEPT: &str = "application/vnd.urbanairship+json; version=3;";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Retries after the first attempt (4 retries = 5 attempts)
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert("Accept".to_string(), AIRSHIP_ACCEPT.to_string());

        Self {
            timeout: Duration::from_secs(30),
            max_retries: 4,
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(60),
            rate_limit: None,
            default_headers,
            user_agent: format!("tap-urban-airship/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }

    /// Total number of attempts made for one request
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set the first backoff delay and its cap
    pub fn backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client with retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    auth: AuthConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        Self::with_auth(config, AuthConfig::None)
    }

    /// Create a client with authentication
    pub fn with_auth(config: HttpClientConfig, auth: AuthConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            auth,
            rate_limiter,
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// GET a URL and parse the JSON body, retrying transient failures
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        let max_attempts = self.config.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.try_get_json(url).await {
                Ok(body) => {
                    debug!("Request succeeded: GET {url}");
                    return Ok(body);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.calculate_backoff(attempt - 1);
                    warn!(
                        "GET {} failed ({}), attempt {}/{}, retrying in {:?}",
                        url, e, attempt, max_attempts, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if e.is_retryable() {
                        error!("GET {url} failed after {attempt} attempts: {e}");
                    }
                    return Err(e);
                }
            }
        }
    }

    /// One attempt: send, classify the status, decode the body
    async fn try_get_json(&self, url: &str) -> Result<Value> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let mut req = self.client.get(url);
        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        req = self.auth.apply(req);

        info!("GET {url}");
        let response = req.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log_error_response(url, status.as_u16(), &body);
            return Err(Error::http_status(status.as_u16(), body));
        }

        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&text)
            .map_err(|e| Error::decode(format!("Invalid JSON body from {url}: {e}")))
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else {
            Error::Http(e)
        }
    }

    /// Calculate backoff delay for a given retry (0-based)
    ///
    /// The delay doubles with every retry, capped at `max_backoff`.
    pub fn calculate_backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        let delay = self.config.initial_backoff.saturating_mul(factor);
        std::cmp::min(delay, self.config.max_backoff)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("auth", &self.auth)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Log an error response, using the Airship error envelope when present
fn log_error_response(url: &str, status: u16, body: &str) {
    let envelope = serde_json::from_str::<Value>(body).ok().and_then(|data| {
        let message = data.get("error")?.as_str()?.to_string();
        let code = data.get("error_code").map(ToString::to_string)?;
        Some((message, code))
    });

    match envelope {
        Some((message, code)) => error!("GET {url} [{status} - {message} ({code})]"),
        None => error!("GET {url} [{status} - {body}]"),
    }
}
