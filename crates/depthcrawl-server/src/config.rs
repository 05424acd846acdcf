use depthcrawl_core::{CrawlConfig, CrawlError};

/// Server settings, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
    pub crawl: CrawlConfig,
}

impl ServerConfig {
    /// Read configuration from environment variables.
    ///
    /// - `DEPTHCRAWL_HOST` (optional, defaults to `0.0.0.0`)
    /// - `DEPTHCRAWL_PORT` (optional, defaults to 8000)
    /// - `DEPTHCRAWL_API_KEY` (optional, enables bearer auth on `/api/v1/*`)
    /// - crawl settings, see [`CrawlConfig::from_env`]
    pub fn from_env() -> Result<Self, CrawlError> {
        let crawl = CrawlConfig::from_env()?;
        Self::from_lookup(|key| std::env::var(key).ok(), crawl)
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        crawl: CrawlConfig,
    ) -> Result<Self, CrawlError> {
        let host = lookup("DEPTHCRAWL_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("DEPTHCRAWL_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                CrawlError::Config(format!("DEPTHCRAWL_PORT '{raw}' is not a valid port"))
            })?,
            None => 8000,
        };

        let api_key = lookup("DEPTHCRAWL_API_KEY").filter(|key| !key.is_empty());

        Ok(Self {
            host,
            port,
            api_key,
            crawl,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
