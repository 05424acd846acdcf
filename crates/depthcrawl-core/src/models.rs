use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::error::{CrawlError, ErrorKind};
use crate::scope::CrawlScope;

/// Depth -> URLs first recorded at that depth, in recording order.
pub type LinksByDepth = BTreeMap<u32, Vec<String>>;

/// A decision to visit `url` at `depth`. Consumed once by the frontier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: Url,
    pub depth: u32,
}

impl CrawlTask {
    pub fn root(scope: &CrawlScope) -> Self {
        Self {
            url: scope.root().clone(),
            depth: 0,
        }
    }

    pub fn child(&self, url: Url) -> Self {
        Self {
            url,
            depth: self.depth + 1,
        }
    }
}

/// A per-page failure recorded in the crawl's error log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub url: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorRecord {
    pub fn new(url: &Url, error: &CrawlError) -> Self {
        Self {
            url: url.to_string(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error crawling {}: {}", self.url, self.message)
    }
}

/// Final snapshot of a finished crawl.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlOutcome {
    pub root_url: String,
    pub max_depth: u32,
    /// Number of distinct URLs across all depth buckets. Errors are not counted.
    pub total_links: usize,
    /// Wall-clock duration, rounded to hundredths of a second.
    pub crawl_time_seconds: f64,
    pub links_by_depth: LinksByDepth,
    pub errors: Vec<ErrorRecord>,
}

impl CrawlOutcome {
    pub fn new(
        scope: &CrawlScope,
        links_by_depth: LinksByDepth,
        errors: Vec<ErrorRecord>,
        elapsed: Duration,
    ) -> Self {
        let total_links = links_by_depth.values().map(Vec::len).sum();
        Self {
            root_url: scope.root().to_string(),
            max_depth: scope.max_depth(),
            total_links,
            crawl_time_seconds: (elapsed.as_secs_f64() * 100.0).round() / 100.0,
            links_by_depth,
            errors,
        }
    }

    /// Error log rendered as `"Error crawling <url>: <message>"` lines.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// The depth `url` was recorded at, if it was recorded at all.
    pub fn depth_of(&self, url: &str) -> Option<u32> {
        self.links_by_depth
            .iter()
            .find(|(_, urls)| urls.iter().any(|u| u == url))
            .map(|(depth, _)| *depth)
    }
}
