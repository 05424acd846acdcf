pub mod config;
pub mod error;
pub mod frontier;
pub mod models;
pub mod pipeline;
pub mod scope;
pub mod throttle;
pub mod traits;
pub mod util;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use config::CrawlConfig;
pub use error::{CrawlError, ErrorKind};
pub use frontier::Crawler;
pub use models::{CrawlOutcome, CrawlTask, ErrorRecord, LinksByDepth};
pub use pipeline::FetchPipeline;
pub use scope::{CrawlScope, MAX_DEPTH_LIMIT};
pub use throttle::{RateLimit, RateLimitedFetcher};
pub use traits::{Fetcher, LinkExtractor};
