//! Validated crawl parameters: canonical root, origin filter and depth bound.

use url::{Origin, Url};

use crate::error::CrawlError;
use crate::util::canonicalize;

/// Largest `max_depth` a crawl may request.
pub const MAX_DEPTH_LIMIT: u32 = 5;

/// The root, origin and depth budget of one crawl.
///
/// Constructing a scope is the only validation step of a crawl: once a
/// `CrawlScope` exists the crawl itself cannot fail as a whole.
#[derive(Debug, Clone)]
pub struct CrawlScope {
    root: Url,
    origin: Origin,
    max_depth: u32,
}

impl CrawlScope {
    /// Validate a root URL and depth.
    ///
    /// The root must be an absolute `http`/`https` URL with a host, and
    /// `max_depth` must lie in `0..=MAX_DEPTH_LIMIT`.
    pub fn new(root_url: &str, max_depth: i64) -> Result<Self, CrawlError> {
        let max_depth = validate_depth(max_depth)?;

        let root = Url::parse(root_url.trim())
            .map_err(|e| CrawlError::Config(format!("Invalid root URL '{root_url}': {e}")))?;

        match root.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(CrawlError::Config(format!(
                    "Root URL scheme '{scheme}' is not supported (only http/https)"
                )));
            }
        }

        if root.host_str().is_none_or(str::is_empty) {
            return Err(CrawlError::Config(format!(
                "Root URL has no host: {root_url}"
            )));
        }

        let origin = root.origin();
        if !origin.is_tuple() {
            return Err(CrawlError::Config(format!(
                "Root URL has no resolvable origin: {root_url}"
            )));
        }

        Ok(Self {
            root: canonicalize(root),
            origin,
            max_depth,
        })
    }

    /// The canonical root URL, recorded at depth 0.
    pub fn root(&self) -> &Url {
        &self.root
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

fn validate_depth(max_depth: i64) -> Result<u32, CrawlError> {
    u32::try_from(max_depth)
        .ok()
        .filter(|depth| *depth <= MAX_DEPTH_LIMIT)
        .ok_or_else(|| {
            CrawlError::Config(format!(
                "max_depth must be between 0 and {MAX_DEPTH_LIMIT}, got {max_depth}"
            ))
        })
}
