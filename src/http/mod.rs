//! HTTP client module
//!
//! Authenticated JSON GETs with retry, backoff and optional rate limiting.
//!
//! # Features
//!
//! - **Automatic Retries**: transient failures retried with exponential backoff
//! - **Error Classification**: 4xx responses abort without retrying
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Authentication**: HTTP Basic credentials on every request

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, AIRSHIP_ACCEPT};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
