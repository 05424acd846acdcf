use std::future::Future;

use url::Url;

use crate::error::CrawlError;

/// Fetches the body text of a page.
///
/// Implementations own timeouts, redirects and connection pooling. Any
/// failure (network error, timeout, non-success status after redirects)
/// is reported as a fetch-kind [`CrawlError`].
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, CrawlError>> + Send;
}

/// Extracts hyperlinks from a fetched page.
pub trait LinkExtractor: Send + Sync + Clone {
    /// Returns the absolute URLs referenced by anchor elements in `body`,
    /// resolved against `base_url` and restricted to its origin.
    ///
    /// Fails with [`CrawlError::Extract`] when `body` is not HTML.
    fn extract_links(&self, body: &str, base_url: &Url) -> Result<Vec<Url>, CrawlError>;
}
