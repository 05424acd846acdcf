use depthcrawl_client::{HtmlLinkExtractor, ReqwestFetcher};
use depthcrawl_core::{CrawlConfig, CrawlError, Crawler, RateLimitedFetcher};

/// The crawler every request shares: real HTTP behind one rate limiter.
pub type SiteCrawler = Crawler<RateLimitedFetcher<ReqwestFetcher>, HtmlLinkExtractor>;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub crawler: SiteCrawler,
    /// API key protecting `/api/v1/*` (None = open access).
    pub api_key: Option<String>,
}

impl AppState {
    /// Build the shared crawler from `config`.
    ///
    /// All crawls served by this state draw from the same outbound rate
    /// limit, whichever request started them.
    pub fn new(config: &CrawlConfig, api_key: Option<String>) -> Result<Self, CrawlError> {
        let fetcher = ReqwestFetcher::with_timeout(config.fetch_timeout)?;
        let fetcher = RateLimitedFetcher::new(fetcher, config.rate_limit)?;
        let crawler = Crawler::new(fetcher, HtmlLinkExtractor)
            .with_max_concurrent_fetches(config.max_concurrent_fetches);

        Ok(Self { crawler, api_key })
    }
}
