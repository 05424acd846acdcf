use depthcrawl_core::error::CrawlError;
use depthcrawl_core::traits::LinkExtractor;
use depthcrawl_core::util::resolve;
use scraper::{Html, Selector};
use url::Url;

const ANCHOR_SELECTOR: &str = "a[href]";

/// Schemes that never point at a crawlable page.
const SKIPPED_SCHEMES: [&str; 4] = ["mailto:", "tel:", "javascript:", "data:"];

/// Link extractor that parses HTML with scraper.
///
/// Returns the absolute, fragment-free targets of every `<a href>` on the
/// page that share the page's origin, in document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, body: &str, base_url: &Url) -> Result<Vec<Url>, CrawlError> {
        ensure_html(body, base_url)?;

        let selector = Selector::parse(ANCHOR_SELECTOR)
            .map_err(|e| CrawlError::Extract(format!("Invalid selector: {e}")))?;
        let document = Html::parse_document(body);
        let origin = base_url.origin();

        let links = document
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::trim)
            .filter(|href| is_followable(href))
            .filter_map(|href| resolve(base_url, href))
            .filter(|link| matches!(link.scheme(), "http" | "https"))
            .filter(|link| link.origin() == origin)
            .collect();

        Ok(links)
    }
}

/// Reject bodies that are clearly not markup.
fn ensure_html(body: &str, base_url: &Url) -> Result<(), CrawlError> {
    if body.contains('\0') {
        return Err(CrawlError::Extract(format!(
            "Body of {base_url} contains binary data"
        )));
    }
    match body.trim_start().chars().next() {
        None | Some('<') => Ok(()),
        Some(_) => Err(CrawlError::Extract(format!(
            "Body of {base_url} is not HTML"
        ))),
    }
}

fn is_followable(href: &str) -> bool {
    if href.is_empty() || href.starts_with('#') {
        return false;
    }
    let lower = href.to_ascii_lowercase();
    !SKIPPED_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}
