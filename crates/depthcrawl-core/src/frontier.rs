//! Frontier controller: depth-bounded, deduplicated, concurrent traversal.
//!
//! One tokio task is spawned per dispatched URL. Each task claims its URL in
//! the shared [`FrontierState`], fetches it through the [`FetchPipeline`] and
//! dispatches its unvisited children as new tasks. A per-crawl
//! [`TaskTracker`] joins the whole dynamically growing task tree: the crawl
//! is complete when the tracker is closed and empty.
//!
//! Dropping the crawl future cancels the crawl: in-flight fetches are
//! abandoned and no further children are dispatched.
//!
//! ```text
//! dispatch(root, 0)
//!    └─ visit: claim → record → fetch → dispatch(child, 1) ...
//!                                      └─ visit: claim → record → fetch ...
//! ```

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, Semaphore};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::Instrument;
use url::{Origin, Url};
use uuid::Uuid;

use crate::error::CrawlError;
use crate::models::{CrawlOutcome, CrawlTask, ErrorRecord, LinksByDepth};
use crate::pipeline::FetchPipeline;
use crate::scope::CrawlScope;
use crate::traits::{Fetcher, LinkExtractor};

/// Default bound on fetches in flight within one crawl.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 10;

/// Drives crawls over a [`FetchPipeline`].
///
/// A `Crawler` holds no traversal state between calls; every crawl owns its
/// own visited set, results and error log, so one `Crawler` can run many
/// crawls at once.
#[derive(Clone)]
pub struct Crawler<F, X>
where
    F: Fetcher,
    X: LinkExtractor,
{
    pipeline: FetchPipeline<F, X>,
    max_concurrent_fetches: usize,
}

impl<F, X> Crawler<F, X>
where
    F: Fetcher + 'static,
    X: LinkExtractor + 'static,
{
    pub fn new(fetcher: F, extractor: X) -> Self {
        Self {
            pipeline: FetchPipeline::new(fetcher, extractor),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }

    /// Bound the number of fetches in flight within one crawl (minimum 1).
    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max.max(1);
        self
    }

    /// Validate `root_url` and `max_depth`, then crawl.
    ///
    /// Fails only with [`CrawlError::Config`]; per-page failures end up in
    /// [`CrawlOutcome::errors`].
    pub async fn crawl_url(
        &self,
        root_url: &str,
        max_depth: i64,
    ) -> Result<CrawlOutcome, CrawlError> {
        let scope = CrawlScope::new(root_url, max_depth)?;
        Ok(self.crawl(&scope).await)
    }

    /// Crawl `scope` to quiescence and return the outcome.
    pub async fn crawl(&self, scope: &CrawlScope) -> CrawlOutcome {
        let span = tracing::info_span!(
            "crawl",
            crawl_id = %Uuid::new_v4(),
            root = %scope.root(),
            max_depth = scope.max_depth(),
        );
        self.run(scope).instrument(span).await
    }

    async fn run(&self, scope: &CrawlScope) -> CrawlOutcome {
        let started = Instant::now();
        tracing::info!(
            max_concurrent_fetches = self.max_concurrent_fetches,
            "Starting crawl"
        );

        let run = Arc::new(CrawlRun {
            pipeline: self.pipeline.clone(),
            origin: scope.origin().clone(),
            max_depth: scope.max_depth(),
            state: Mutex::new(FrontierState::default()),
            permits: Semaphore::new(self.max_concurrent_fetches),
            tracker: TaskTracker::new(),
            cancel: CancellationToken::new(),
        });
        // Stops every task of this crawl if the caller drops us mid-crawl.
        let _cancel_on_drop = run.cancel.clone().drop_guard();

        dispatch(&run, CrawlTask::root(scope));
        run.tracker.close();
        run.tracker.wait().await;

        let state = std::mem::take(&mut *run.state.lock().await);
        let outcome = CrawlOutcome::new(
            scope,
            state.links_by_depth,
            state.errors,
            started.elapsed(),
        );

        tracing::info!(
            total_links = outcome.total_links,
            errors = outcome.errors.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Crawl finished"
        );
        outcome
    }
}

/// The state shared by all tasks of one crawl. Guarded by a single lock.
#[derive(Debug, Default)]
struct FrontierState {
    visited: HashSet<String>,
    links_by_depth: LinksByDepth,
    errors: Vec<ErrorRecord>,
}

impl FrontierState {
    /// Test-and-insert `url` into the visited set and, if it was new, record
    /// it under `depth`. Both happen under the same lock acquisition, so a
    /// URL can be claimed, and therefore fetched, at most once.
    fn claim(&mut self, url: &Url, depth: u32) -> bool {
        if !self.visited.insert(url.as_str().to_owned()) {
            return false;
        }
        self.links_by_depth
            .entry(depth)
            .or_default()
            .push(url.to_string());
        true
    }

    fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }
}

/// Everything the tasks of one crawl share.
struct CrawlRun<F, X>
where
    F: Fetcher,
    X: LinkExtractor,
{
    pipeline: FetchPipeline<F, X>,
    origin: Origin,
    max_depth: u32,
    state: Mutex<FrontierState>,
    permits: Semaphore,
    tracker: TaskTracker,
    cancel: CancellationToken,
}

/// Spawn a task visiting `task` on the crawl's tracker.
///
/// Spawning happens from inside a still-running tracked task (or before the
/// tracker is closed), so the tracker cannot become empty while work remains.
fn dispatch<F, X>(run: &Arc<CrawlRun<F, X>>, task: CrawlTask)
where
    F: Fetcher + 'static,
    X: LinkExtractor + 'static,
{
    let span = tracing::Span::current();
    run.tracker
        .spawn(visit(Arc::clone(run), task).instrument(span));
}

async fn visit<F, X>(run: Arc<CrawlRun<F, X>>, task: CrawlTask)
where
    F: Fetcher + 'static,
    X: LinkExtractor + 'static,
{
    let claimed = run.state.lock().await.claim(&task.url, task.depth);
    if !claimed {
        tracing::trace!(url = %task.url, depth = task.depth, "Already visited");
        return;
    }

    if task.depth >= run.max_depth {
        tracing::debug!(url = %task.url, depth = task.depth, "Depth limit reached");
        return;
    }

    let result = tokio::select! {
        biased;
        () = run.cancel.cancelled() => {
            tracing::debug!(url = %task.url, "Crawl cancelled, skipping fetch");
            return;
        }
        result = fetch_with_permit(&run, &task.url) => result,
    };
    let Some(result) = result else {
        return;
    };

    match result {
        Ok(_) if run.cancel.is_cancelled() => {}
        Ok(children) => {
            let fresh: Vec<Url> = {
                let state = run.state.lock().await;
                children
                    .into_iter()
                    .filter(|child| !state.is_visited(child))
                    .collect()
            };
            tracing::debug!(
                url = %task.url,
                depth = task.depth,
                children = fresh.len(),
                "Dispatching children"
            );
            for child in fresh {
                dispatch(&run, task.child(child));
            }
        }
        Err(error) => {
            tracing::warn!(url = %task.url, depth = task.depth, %error, "Page failed");
            run.state
                .lock()
                .await
                .errors
                .push(ErrorRecord::new(&task.url, &error));
        }
    }
}

/// Fetch `url` once a concurrency permit is available.
///
/// Returns `None` if the semaphore was closed.
async fn fetch_with_permit<F, X>(
    run: &CrawlRun<F, X>,
    url: &Url,
) -> Option<Result<Vec<Url>, CrawlError>>
where
    F: Fetcher,
    X: LinkExtractor,
{
    let _permit = run.permits.acquire().await.ok()?;
    Some(run.pipeline.fetch_and_extract(url, &run.origin).await)
}
