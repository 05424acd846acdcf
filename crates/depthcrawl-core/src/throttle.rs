//! Global outbound rate limiting for polite fetching.
//!
//! Wraps any [`Fetcher`] with a token bucket shared by every clone of the
//! wrapper. All concurrent fetches of all crawls that use the same
//! [`RateLimitedFetcher`] draw from one budget, so the target origin sees a
//! bounded request rate no matter how wide the crawl fans out.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use depthcrawl_core::throttle::{RateLimit, RateLimitedFetcher};
//!
//! # use depthcrawl_core::traits::Fetcher;
//! # #[derive(Clone)] struct MyFetcher;
//! # impl Fetcher for MyFetcher {
//! #     async fn fetch(&self, _: &str) -> Result<String, depthcrawl_core::error::CrawlError> { todo!() }
//! # }
//! # fn run() -> Result<(), depthcrawl_core::error::CrawlError> {
//! // At most 100 requests per minute, bursts of up to 100.
//! let fetcher = RateLimitedFetcher::new(MyFetcher, RateLimit::per_minute(100))?;
//! # Ok(())
//! # }
//! ```

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tracing::Instrument;

use crate::error::CrawlError;
use crate::traits::Fetcher;

/// `requests` per `period`, with bursts of up to `requests`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub requests: u32,
    pub period: Duration,
}

impl RateLimit {
    pub fn new(requests: u32, period: Duration) -> Self {
        Self { requests, period }
    }

    pub fn per_minute(requests: u32) -> Self {
        Self::new(requests, Duration::from_secs(60))
    }

    fn quota(&self) -> Result<Quota, CrawlError> {
        let burst = NonZeroU32::new(self.requests).ok_or_else(|| {
            CrawlError::Config("Rate limit must allow at least one request".into())
        })?;
        Quota::with_period(self.period / self.requests)
            .map(|quota| quota.allow_burst(burst))
            .ok_or_else(|| CrawlError::Config("Rate limit period must be non-zero".into()))
    }
}

impl Default for RateLimit {
    /// 100 requests per minute.
    fn default() -> Self {
        Self::per_minute(100)
    }
}

/// A [`Fetcher`] wrapper that waits for a token before every request.
///
/// Waiting suspends only the calling task; unrelated tasks keep running.
#[derive(Clone)]
pub struct RateLimitedFetcher<F> {
    inner: F,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl<F: Fetcher> RateLimitedFetcher<F> {
    /// Wrap an existing fetcher with a fresh token bucket.
    pub fn new(inner: F, limit: RateLimit) -> Result<Self, CrawlError> {
        Ok(Self::with_limiter(
            inner,
            Arc::new(RateLimiter::direct(limit.quota()?)),
        ))
    }

    /// Wrap an existing fetcher with a bucket shared with other wrappers.
    pub fn with_limiter(inner: F, limiter: Arc<DefaultDirectRateLimiter>) -> Self {
        Self { inner, limiter }
    }
}

impl<F: Fetcher> Fetcher for RateLimitedFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        self.limiter
            .until_ready()
            .instrument(tracing::debug_span!("rate_limiter", %url))
            .await;
        self.inner.fetch(url).await
    }
}
