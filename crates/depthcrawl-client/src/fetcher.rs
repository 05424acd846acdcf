use std::time::Duration;

use depthcrawl_core::error::CrawlError;
use depthcrawl_core::traits::Fetcher;
use reqwest::Client;
use reqwest::redirect::Policy;

const USER_AGENT: &str = concat!("depthcrawl/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REDIRECTS: usize = 10;
const MAX_IDLE_PER_HOST: usize = 5;

/// HTTP fetcher using reqwest.
///
/// Downloads page bodies with a fixed User-Agent, a per-request timeout and
/// a bounded redirect chain. Clones share the underlying connection pool.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, CrawlError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, CrawlError> {
        let timeout_secs = timeout.as_secs();
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
            .build()
            .map_err(|e| CrawlError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                CrawlError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                CrawlError::Network(format!("Connection failed for {url}: {e}"))
            } else {
                CrawlError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        tracing::debug!(%url, status = status.as_u16(), "Response received");
        if !status.is_success() {
            return Err(CrawlError::Http(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                CrawlError::Timeout(self.timeout_secs)
            } else {
                CrawlError::Http(format!("Failed to read response body of {url}: {e}"))
            }
        })
    }
}
