use std::collections::HashSet;

use url::{Origin, Url};

use crate::error::CrawlError;
use crate::traits::{Fetcher, LinkExtractor};
use crate::util::canonicalize;

/// Turns one URL into its same-origin child URLs: fetch → extract → filter.
///
/// Generic over both collaborators via traits, so it can be exercised
/// without real HTTP. Knows nothing about depth or visited state, and keeps
/// no mutable state of its own: concurrent calls for different URLs are safe.
#[derive(Clone)]
pub struct FetchPipeline<F, X>
where
    F: Fetcher,
    X: LinkExtractor,
{
    fetcher: F,
    extractor: X,
}

impl<F, X> FetchPipeline<F, X>
where
    F: Fetcher,
    X: LinkExtractor,
{
    pub fn new(fetcher: F, extractor: X) -> Self {
        Self { fetcher, extractor }
    }

    /// Fetch `url` and return the canonical child URLs that belong to `origin`.
    ///
    /// `origin` is the crawl origin resolved from the root URL, not the
    /// origin of `url` itself, so a page redirected to another host cannot
    /// widen the crawl. Children are deduplicated in first-seen order.
    pub async fn fetch_and_extract(
        &self,
        url: &Url,
        origin: &Origin,
    ) -> Result<Vec<Url>, CrawlError> {
        tracing::debug!(%url, "Fetching");
        let body = self.fetcher.fetch(url.as_str()).await?;
        tracing::debug!(%url, bytes = body.len(), "Fetched");

        let links = self.extractor.extract_links(&body, url)?;
        let found = links.len();

        let mut seen = HashSet::new();
        let children: Vec<Url> = links
            .into_iter()
            .map(canonicalize)
            .filter(|link| link.origin() == *origin)
            .filter(|link| seen.insert(link.as_str().to_owned()))
            .collect();

        tracing::debug!(%url, found, kept = children.len(), "Extracted links");
        Ok(children)
    }
}
