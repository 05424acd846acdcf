use thiserror::Error;

/// Error types for depthcrawl.
///
/// Only [`CrawlError::Config`] is fatal to a crawl. Every other variant is a
/// per-URL failure that the frontier records in the crawl's error log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrawlError {
    /// Malformed root URL, unsupported scheme, depth out of range or a bad
    /// configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request completed with a non-success status, or the response
    /// could not be read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The page body could not be parsed as HTML.
    #[error("Extract error: {0}")]
    Extract(String),
}

/// Coarse classification of a [`CrawlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Configuration,
    Fetch,
    Extract,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::Fetch => write!(f, "fetch"),
            ErrorKind::Extract => write!(f, "extract"),
        }
    }
}

impl CrawlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CrawlError::Config(_) => ErrorKind::Configuration,
            CrawlError::Http(_) | CrawlError::Network(_) | CrawlError::Timeout(_) => {
                ErrorKind::Fetch
            }
            CrawlError::Extract(_) => ErrorKind::Extract,
        }
    }

    /// Returns true if this error aborts the whole crawl rather than a single page.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}
