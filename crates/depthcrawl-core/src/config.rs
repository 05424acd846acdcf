use std::time::Duration;

use crate::error::CrawlError;
use crate::frontier::DEFAULT_MAX_CONCURRENT_FETCHES;
use crate::throttle::RateLimit;

/// Tuning knobs shared by every crawl a process runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Upper bound on fetches in flight within one crawl.
    pub max_concurrent_fetches: usize,
    /// Outbound request budget shared by all fetches.
    pub rate_limit: RateLimit,
    /// Per-request timeout handed to the HTTP fetcher.
    pub fetch_timeout: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            rate_limit: RateLimit::default(),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl CrawlConfig {
    /// Read configuration from environment variables.
    ///
    /// - `DEPTHCRAWL_MAX_CONCURRENT_FETCHES` (optional, defaults to 10)
    /// - `DEPTHCRAWL_RATE_LIMIT` requests per `DEPTHCRAWL_RATE_PERIOD_SECS`
    ///   (optional, defaults to 100 per 60)
    /// - `DEPTHCRAWL_FETCH_TIMEOUT_SECS` (optional, defaults to 10)
    pub fn from_env() -> Result<Self, CrawlError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CrawlError> {
        let defaults = Self::default();

        let max_concurrent_fetches = positive(
            &lookup,
            "DEPTHCRAWL_MAX_CONCURRENT_FETCHES",
            defaults.max_concurrent_fetches as u64,
        )? as usize;

        let requests = positive(
            &lookup,
            "DEPTHCRAWL_RATE_LIMIT",
            u64::from(defaults.rate_limit.requests),
        )?;
        let requests = u32::try_from(requests).map_err(|_| {
            CrawlError::Config(format!("DEPTHCRAWL_RATE_LIMIT '{requests}' is too large"))
        })?;
        let period_secs = positive(
            &lookup,
            "DEPTHCRAWL_RATE_PERIOD_SECS",
            defaults.rate_limit.period.as_secs(),
        )?;

        let timeout_secs = positive(
            &lookup,
            "DEPTHCRAWL_FETCH_TIMEOUT_SECS",
            defaults.fetch_timeout.as_secs(),
        )?;

        Ok(Self {
            max_concurrent_fetches,
            rate_limit: RateLimit::new(requests, Duration::from_secs(period_secs)),
            fetch_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn positive(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<u64, CrawlError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let parsed: u64 = raw.trim().parse().map_err(|_| {
        CrawlError::Config(format!("Invalid {key} '{raw}': must be a positive integer"))
    })?;
    if parsed == 0 {
        return Err(CrawlError::Config(format!("{key} must be at least 1")));
    }
    Ok(parsed)
}
