//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns everything a single crawl needs:
//! - Parsing the seed and building the frontier root
//! - Running the worker pool to completion
//! - Stopping early on deadline expiry or an external shutdown request
//! - Producing the final frontier snapshot and statistics

use crate::config::Config;
use crate::crawler::frontier::{Frontier, FrontierSnapshot};
use crate::crawler::scanner::{HttpScanner, Scanner};
use crate::crawler::worker::WorkerPool;
use crate::output::CrawlStatistics;
use crate::url::parse_seed;
use crate::CrawlError;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub snapshot: FrontierSnapshot,
    pub stats: CrawlStatistics,
}

/// Stops a running crawl from outside the worker pool
///
/// Triggering closes the frontier: workers finish the page they are on and
/// exit, and the partial result is still returned from [`Coordinator::run`].
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    frontier: Arc<Frontier>,
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        self.frontier.close();
    }

    pub fn is_triggered(&self) -> bool {
        self.frontier.is_closed()
    }
}

/// Main crawler coordinator structure
pub struct Coordinator<S: Scanner = HttpScanner> {
    config: Config,
    frontier: Arc<Frontier>,
    scanner: Arc<S>,
}

impl Coordinator<HttpScanner> {
    /// Creates a coordinator that fetches pages over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlError::SeedParse)` - The seed URL is unusable
    /// * `Err(CrawlError::HttpClient)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        let seed = seed_from_config(&config)?;
        let scanner = HttpScanner::new(&config.http)?;
        Ok(Self::build(config, seed, scanner))
    }
}

impl<S: Scanner> Coordinator<S> {
    /// Creates a coordinator driven by a custom scanner
    pub fn with_scanner(config: Config, scanner: S) -> Result<Self, CrawlError> {
        let seed = seed_from_config(&config)?;
        Ok(Self::build(config, seed, scanner))
    }

    fn build(config: Config, seed: Url, scanner: S) -> Self {
        let frontier = Frontier::new(
            seed,
            config.crawler.max_depth,
            config.crawler.scan_foreign,
        );

        Self {
            config,
            frontier: Arc::new(frontier),
            scanner: Arc::new(scanner),
        }
    }

    /// Returns the parsed seed URL
    pub fn seed(&self) -> &Url {
        self.frontier.seed()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a handle that can stop the crawl once it is running
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            frontier: Arc::clone(&self.frontier),
        }
    }

    /// Runs the crawl to completion
    ///
    /// Returns once every worker has exited: either nothing is left to
    /// claim, or the crawl was stopped by the deadline or a shutdown handle.
    /// Per-page failures never end the crawl.
    pub async fn run(self) -> CrawlOutcome {
        let started_at = Utc::now();
        let crawler = &self.config.crawler;

        tracing::info!(
            "Starting crawl of {} (max depth {}, {} workers, foreign hosts {})",
            self.frontier.seed(),
            crawler.max_depth,
            crawler.workers,
            if crawler.scan_foreign {
                "scanned"
            } else {
                "recorded only"
            }
        );

        let deadline = crawler.deadline_secs.map(|secs| {
            let handle = self.shutdown_handle();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(secs)).await;
                tracing::warn!("Deadline of {}s reached, stopping crawl", secs);
                handle.trigger();
            })
        });

        let pool = WorkerPool::new(crawler.workers as usize);
        let reports = pool
            .run(Arc::clone(&self.frontier), Arc::clone(&self.scanner))
            .await;

        if let Some(task) = deadline {
            task.abort();
        }

        let finished_at = Utc::now();

        // Shutdown handles may still be alive, in which case copy instead
        let snapshot = match Arc::try_unwrap(self.frontier) {
            Ok(frontier) => frontier.into_snapshot(),
            Err(shared) => shared.snapshot(),
        };

        let stats = CrawlStatistics::collect(&snapshot, &reports, started_at, finished_at);

        tracing::info!(
            "Crawl complete: {} pages discovered, {} fetched",
            stats.total_pages,
            stats.pages_fetched
        );

        CrawlOutcome { snapshot, stats }
    }
}

fn seed_from_config(config: &Config) -> Result<Url, CrawlError> {
    let raw = &config.crawler.seed_url;
    parse_seed(raw).map_err(|source| CrawlError::SeedParse {
        url: raw.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlerOverrides;
    use crate::state::{PageState, SkipReason};
    use std::collections::HashMap;

    /// Serves a fixed link map; pages not in the map yield no links
    struct MapScanner {
        links: HashMap<String, Vec<String>>,
        delay: Duration,
    }

    impl MapScanner {
        fn new<U: ToString>(links: Vec<(U, Vec<U>)>) -> Self {
            Self {
                links: links
                    .into_iter()
                    .map(|(url, found)| {
                        let found = found.iter().map(ToString::to_string).collect();
                        (url.to_string(), found)
                    })
                    .collect(),
                delay: Duration::ZERO,
            }
        }
    }

    impl Scanner for MapScanner {
        async fn scan(&self, url: &Url) -> Vec<String> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.links.get(url.as_str()).cloned().unwrap_or_default()
        }
    }

    fn config(seed: &str, max_depth: u32, workers: u32) -> Config {
        let mut config = Config::default();
        config.apply_overrides(CrawlerOverrides {
            seed_url: Some(seed.to_string()),
            max_depth: Some(max_depth),
            workers: Some(workers),
            scan_foreign: false,
        });
        config
    }

    #[test]
    fn test_invalid_seed_is_fatal() {
        let result = Coordinator::with_scanner(
            config("http://", 1, 1),
            MapScanner::new(Vec::<(&str, Vec<&str>)>::new()),
        );
        assert!(matches!(result, Err(CrawlError::SeedParse { .. })));

        let result = Coordinator::with_scanner(
            config("ftp://example.com/", 1, 1),
            MapScanner::new(Vec::<(&str, Vec<&str>)>::new()),
        );
        assert!(matches!(result, Err(CrawlError::SeedParse { .. })));
    }

    #[test]
    fn test_http_coordinator_new() {
        let coordinator = Coordinator::new(config("example.com", 1, 1)).unwrap();
        assert_eq!(coordinator.seed().as_str(), "http://example.com/");
    }

    #[tokio::test]
    async fn test_run_depth_one() {
        let scanner = MapScanner::new(vec![(
            "http://example.com/",
            vec!["/a", "http://other.com/b", "/a"],
        )]);
        let coordinator =
            Coordinator::with_scanner(config("http://example.com/", 1, 1), scanner).unwrap();

        let outcome = coordinator.run().await;
        let snapshot = &outcome.snapshot;

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.root().links.len(), 3);
        assert!(snapshot.root().was_fetched());

        let a = snapshot.find("http://example.com/a").unwrap();
        assert_eq!(a.depth, 1);
        assert_eq!(a.skip, Some(SkipReason::DepthLimit));

        assert_eq!(outcome.stats.pages_fetched, 1);
        assert_eq!(outcome.stats.reference_links, 1);
        assert!(!outcome.stats.interrupted);
    }

    #[tokio::test]
    async fn test_run_max_depth_zero_fetches_nothing() {
        let coordinator = Coordinator::with_scanner(
            config("http://example.com/", 0, 2),
            MapScanner::new(vec![("http://example.com/", vec!["/a"])]),
        )
        .unwrap();

        let outcome = coordinator.run().await;
        assert_eq!(outcome.snapshot.len(), 1);
        assert_eq!(outcome.snapshot.root().state, PageState::Scanned);
        assert!(outcome.snapshot.root().links.is_empty());
        assert_eq!(outcome.stats.pages_fetched, 0);
    }

    #[tokio::test]
    async fn test_shutdown_before_run() {
        let coordinator = Coordinator::with_scanner(
            config("http://example.com/", 3, 2),
            MapScanner::new(vec![("http://example.com/", vec!["/a"])]),
        )
        .unwrap();

        let handle = coordinator.shutdown_handle();
        handle.trigger();
        assert!(handle.is_triggered());

        let outcome = coordinator.run().await;
        assert!(outcome.stats.interrupted);
        assert_eq!(outcome.stats.pages_fetched, 0);
        assert_eq!(outcome.snapshot.root().state, PageState::Pending);
    }

    #[tokio::test]
    async fn test_deadline_stops_crawl() {
        // A long chain of slow pages that only the deadline can cut short
        let mut links = vec![(
            "http://example.com/".to_string(),
            vec!["/0".to_string()],
        )];
        for i in 0..50 {
            links.push((
                format!("http://example.com/{}", i),
                vec![format!("/{}", i + 1)],
            ));
        }

        let mut scanner = MapScanner::new(links);
        scanner.delay = Duration::from_millis(200);

        let mut config = config("http://example.com/", 100, 1);
        config.crawler.deadline_secs = Some(1);

        let outcome = Coordinator::with_scanner(config, scanner)
            .unwrap()
            .run()
            .await;

        assert!(outcome.stats.interrupted);
        assert!(outcome.stats.pages_fetched < 20);
        assert!(outcome
            .snapshot
            .pages()
            .iter()
            .all(|page| page.state != PageState::Claimed));
    }
}
