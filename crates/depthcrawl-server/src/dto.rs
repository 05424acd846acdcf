use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use depthcrawl_core::CrawlOutcome;

// ---------------------------------------------------------------------------
// Crawl
// ---------------------------------------------------------------------------

fn default_max_depth() -> i64 {
    3
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CrawlRequest {
    /// Page the crawl starts from (http or https)
    pub root_url: String,
    /// How many link hops to follow from the root, 0 to 5 (default: 3)
    #[serde(default = "default_max_depth")]
    #[schema(minimum = 0, maximum = 5)]
    pub max_depth: i64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CrawlResponse {
    pub root_url: String,
    pub max_depth: u32,
    pub total_links: usize,
    pub crawl_time_seconds: f64,
    /// Discovered URLs keyed by the depth they were first reached at
    pub links_by_depth: BTreeMap<String, Vec<String>>,
    /// One line per page that could not be fetched or parsed
    pub errors: Vec<String>,
}

impl From<CrawlOutcome> for CrawlResponse {
    fn from(outcome: CrawlOutcome) -> Self {
        let errors = outcome.error_messages();
        Self {
            root_url: outcome.root_url,
            max_depth: outcome.max_depth,
            total_links: outcome.total_links,
            crawl_time_seconds: outcome.crawl_time_seconds,
            links_by_depth: outcome
                .links_by_depth
                .into_iter()
                .map(|(depth, urls)| (depth.to_string(), urls))
                .collect(),
            errors,
        }
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
