use std::fmt::Write as _;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use depthcrawl_client::{HtmlLinkExtractor, ReqwestFetcher};
use depthcrawl_core::{CrawlConfig, CrawlOutcome, Crawler, RateLimit, RateLimitedFetcher};

#[derive(Parser)]
#[command(name = "depthcrawl", version, about = "Depth-bounded same-origin web crawler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a site and list every same-origin page by depth
    Crawl {
        /// Root URL to start from
        #[arg(short, long)]
        url: String,

        /// Link hops to follow from the root (0 to 5)
        #[arg(short = 'd', long, default_value_t = 3, allow_negative_numbers = true)]
        max_depth: i64,

        /// Print the full result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Requests allowed per rate period
        #[arg(long, env = "DEPTHCRAWL_RATE_LIMIT",
              default_value_t = CrawlConfig::default().rate_limit.requests,
              value_parser = clap::value_parser!(u32).range(1..))]
        rate_limit: u32,

        /// Length of the rate period in seconds
        #[arg(long, env = "DEPTHCRAWL_RATE_PERIOD_SECS",
              default_value_t = CrawlConfig::default().rate_limit.period.as_secs(),
              value_parser = clap::value_parser!(u64).range(1..))]
        rate_period: u64,

        /// Maximum fetches in flight
        #[arg(short, long, env = "DEPTHCRAWL_MAX_CONCURRENT_FETCHES",
              default_value_t = CrawlConfig::default().max_concurrent_fetches,
              value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        concurrency: usize,

        /// Per-request timeout in seconds
        #[arg(short, long, env = "DEPTHCRAWL_FETCH_TIMEOUT_SECS",
              default_value_t = CrawlConfig::default().fetch_timeout.as_secs(),
              value_parser = clap::value_parser!(u64).range(1..))]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("depthcrawl=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            url,
            max_depth,
            json,
            rate_limit,
            rate_period,
            concurrency,
            timeout,
        } => {
            let config = CrawlConfig {
                max_concurrent_fetches: concurrency,
                rate_limit: RateLimit::new(rate_limit, Duration::from_secs(rate_period)),
                fetch_timeout: Duration::from_secs(timeout),
            };
            cmd_crawl(&url, max_depth, json, &config).await?;
        }
    }

    Ok(())
}

async fn cmd_crawl(url: &str, max_depth: i64, json: bool, config: &CrawlConfig) -> Result<()> {
    let fetcher = ReqwestFetcher::with_timeout(config.fetch_timeout)
        .context("Failed to create HTTP client")?;
    let fetcher = RateLimitedFetcher::new(fetcher, config.rate_limit)
        .context("Invalid rate limit")?;
    let crawler = Crawler::new(fetcher, HtmlLinkExtractor)
        .with_max_concurrent_fetches(config.max_concurrent_fetches);

    tracing::info!("Crawling {url} to depth {max_depth}");

    let outcome = crawler
        .crawl_url(url, max_depth)
        .await
        .context("Cannot start crawl")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_text(&outcome));
    }

    Ok(())
}

/// Human-readable listing: one section per depth, then errors and a summary.
fn render_text(outcome: &CrawlOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Crawl of {} (max depth {}):\n",
        outcome.root_url, outcome.max_depth
    );

    for (depth, urls) in &outcome.links_by_depth {
        let _ = writeln!(out, "Depth {depth} ({} links):", urls.len());
        for url in urls {
            let _ = writeln!(out, "  {url}");
        }
        out.push('\n');
    }

    if !outcome.errors.is_empty() {
        let _ = writeln!(out, "Errors ({}):", outcome.errors.len());
        for message in outcome.error_messages() {
            let _ = writeln!(out, "  {message}");
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "Total: {} links in {:.2}s, {} errors",
        outcome.total_links,
        outcome.crawl_time_seconds,
        outcome.errors.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use depthcrawl_core::testutil::{MockExtractor, MockSite};

    #[tokio::test]
    async fn test_render_text_lists_depths_and_errors() {
        let site = MockSite::new()
            .page("https://example.com/", &["/a", "/gone"])
            .page("https://example.com/a", &[]);
        let outcome = Crawler::new(site, MockExtractor)
            .crawl_url("https://example.com", 1)
            .await
            .unwrap();

        let text = render_text(&outcome);

        assert!(text.starts_with("Crawl of https://example.com/ (max depth 1):"));
        assert!(text.contains("Depth 0 (1 links):\n  https://example.com/\n"));
        assert!(text.contains("Depth 1 (2 links):"));
        assert!(text.contains("Total: 3 links in"));
        assert!(text.contains("0 errors"));
    }

    #[tokio::test]
    async fn test_render_text_reports_errors() {
        let site = MockSite::new().page("https://example.com/", &["/gone"]);
        let outcome = Crawler::new(site, MockExtractor)
            .crawl_url("https://example.com/", 2)
            .await
            .unwrap();

        let text = render_text(&outcome);

        assert!(text.contains("Errors (1):"));
        assert!(text.contains("Error crawling https://example.com/gone:"));
        assert!(text.contains("1 errors"));
    }

    #[test]
    fn test_cli_parses_crawl_flags() {
        let cli = Cli::try_parse_from([
            "depthcrawl",
            "crawl",
            "--url",
            "https://example.com",
            "--max-depth",
            "-1",
            "--json",
        ])
        .unwrap();

        let Commands::Crawl {
            url,
            max_depth,
            json,
            ..
        } = cli.command;
        assert_eq!(url, "https://example.com");
        assert_eq!(max_depth, -1);
        assert!(json);
    }

    #[test]
    fn test_cli_defaults_follow_crawl_config() {
        let cli = Cli::try_parse_from(["depthcrawl", "crawl", "--url", "https://example.com"])
            .unwrap();
        let defaults = CrawlConfig::default();

        let Commands::Crawl {
            max_depth,
            rate_limit,
            rate_period,
            concurrency,
            timeout,
            ..
        } = cli.command;
        assert_eq!(max_depth, 3);
        assert_eq!(rate_limit, defaults.rate_limit.requests);
        assert_eq!(rate_period, defaults.rate_limit.period.as_secs());
        assert_eq!(concurrency, defaults.max_concurrent_fetches);
        assert_eq!(timeout, defaults.fetch_timeout.as_secs());
    }

    #[test]
    fn test_cli_rejects_zero_concurrency() {
        let result = Cli::try_parse_from([
            "depthcrawl",
            "crawl",
            "--url",
            "https://example.com",
            "--concurrency",
            "0",
        ]);
        assert!(result.is_err());
    }
}
