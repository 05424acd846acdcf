//! Test utilities: mock implementations of the collaborator traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use url::Url;

use crate::error::CrawlError;
use crate::traits::{Fetcher, LinkExtractor};
use crate::util::resolve;

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that returns queued responses regardless of URL.
#[derive(Clone)]
pub struct MockFetcher {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns a default HTML string.
    responses: Arc<Mutex<Vec<Result<String, CrawlError>>>>,
}

impl MockFetcher {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(html.to_string())])
    }

    pub fn with_error(error: CrawlError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, CrawlError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
        }
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, CrawlError> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("<html><body>default</body></html>".to_string())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockSite
// ---------------------------------------------------------------------------

/// An in-memory website: a fetcher keyed by URL that records every call.
///
/// Unknown URLs answer with an HTTP 404 error. An optional per-URL delay
/// (derived from a hash of the URL, so sibling fetches finish out of order)
/// widens race windows in concurrency tests.
#[derive(Clone, Default)]
pub struct MockSite {
    pages: Arc<HashMap<String, Result<String, CrawlError>>>,
    max_delay: Duration,
    fetches: Arc<Mutex<HashMap<String, usize>>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl MockSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an HTML page at `url` linking to each of `hrefs`.
    pub fn page(self, url: &str, hrefs: &[&str]) -> Self {
        let anchors: String = hrefs
            .iter()
            .map(|href| format!("<a href=\"{href}\">{href}</a>\n"))
            .collect();
        self.raw(url, &format!("<html><body>\n{anchors}</body></html>"))
    }

    /// Add a page at `url` with an arbitrary body.
    pub fn raw(self, url: &str, body: &str) -> Self {
        self.insert(url, Ok(body.to_string()))
    }

    /// Make fetching `url` fail with `error`.
    pub fn failing(self, url: &str, error: CrawlError) -> Self {
        self.insert(url, Err(error))
    }

    /// Delay each fetch by up to `max_delay`.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    fn insert(mut self, url: &str, response: Result<String, CrawlError>) -> Self {
        Arc::make_mut(&mut self.pages).insert(url.to_string(), response);
        self
    }

    fn delay_for(&self, url: &str) -> Duration {
        let max_ms = self.max_delay.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        let mut hasher = DefaultHasher::new();
        url.hash(&mut hasher);
        Duration::from_millis(hasher.finish() % (max_ms + 1))
    }

    /// How many times `url` was fetched.
    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetches.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    /// Total number of fetch calls across all URLs.
    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }

    /// Highest fetch count of any single URL (1 when nothing was refetched).
    pub fn max_fetches_per_url(&self) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .values()
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Largest number of fetches that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl Fetcher for MockSite {
    async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delay_for(url);
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(CrawlError::Http(format!("HTTP 404 for {url}"))))
    }
}

// ---------------------------------------------------------------------------
// MockExtractor
// ---------------------------------------------------------------------------

/// Mock extractor that scans for `href="..."` attributes.
///
/// Unlike a real extractor it does not restrict links to the page's origin,
/// so tests can check that the pipeline applies the crawl origin itself.
/// Bodies that do not start with `<` are rejected as non-HTML.
#[derive(Clone, Copy, Default)]
pub struct MockExtractor;

impl LinkExtractor for MockExtractor {
    fn extract_links(&self, body: &str, base_url: &Url) -> Result<Vec<Url>, CrawlError> {
        let trimmed = body.trim_start();
        if !trimmed.is_empty() && !trimmed.starts_with('<') {
            return Err(CrawlError::Extract(format!(
                "Body of {base_url} is not HTML"
            )));
        }

        Ok(body
            .split("href=\"")
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .filter_map(|href| resolve(base_url, href))
            .collect())
    }
}
