//! Crawl statistics
//!
//! Summarises a finished frontier and the worker reports into a single
//! record that is logged when the crawl completes.

use crate::crawler::{FrontierSnapshot, Link, WorkerReport};
use crate::state::SkipReason;
use crate::url::host_key;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Total number of pages discovered (including the seed)
    pub total_pages: usize,

    /// Pages a worker scanned (fetch attempted)
    pub pages_fetched: usize,

    /// Pages created non-claimable, by reason
    pub pages_skipped: HashMap<SkipReason, usize>,

    /// Number of distinct hosts among discovered pages
    pub unique_hosts: usize,

    /// Tree edges (first discovery of a page)
    pub child_links: usize,

    /// Links to pages that were already known
    pub reference_links: usize,

    /// Links dropped because they could not be parsed
    pub malformed_links: usize,

    /// Number of workers that ran to completion
    pub workers: usize,

    /// True if the crawl was stopped while pages were still pending
    pub interrupted: bool,
}

impl CrawlStatistics {
    /// Builds statistics from the final frontier and the worker reports
    pub fn collect(
        snapshot: &FrontierSnapshot,
        reports: &[WorkerReport],
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let mut pages_skipped = HashMap::new();
        let mut hosts = HashSet::new();
        let mut child_links = 0;
        let mut reference_links = 0;
        let mut pages_fetched = 0;

        for page in snapshot.pages() {
            if let Some(reason) = page.skip {
                *pages_skipped.entry(reason).or_insert(0) += 1;
            }
            if page.was_fetched() {
                pages_fetched += 1;
            }
            if let Some(host) = host_key(&page.url) {
                hosts.insert(host);
            }
            for link in &page.links {
                match link {
                    Link::Child(_) => child_links += 1,
                    Link::Reference(_) => reference_links += 1,
                }
            }
        }

        Self {
            started_at,
            finished_at,
            total_pages: snapshot.len(),
            pages_fetched,
            pages_skipped,
            unique_hosts: hosts.len(),
            child_links,
            reference_links,
            malformed_links: snapshot.malformed_links(),
            workers: reports.len(),
            interrupted: snapshot.was_interrupted(),
        }
    }

    /// Wall-clock duration of the crawl
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Number of pages skipped for the given reason
    pub fn skipped(&self, reason: SkipReason) -> usize {
        self.pages_skipped.get(&reason).copied().unwrap_or(0)
    }

    /// Total number of links recorded on fetched pages
    pub fn total_links(&self) -> usize {
        self.child_links + self.reference_links
    }
}

/// Logs statistics at info level on the diagnostic stream
pub fn log_statistics(stats: &CrawlStatistics) {
    let duration = stats.duration();

    tracing::info!(
        "Crawl {} in {}.{:03}s",
        if stats.interrupted {
            "interrupted"
        } else {
            "finished"
        },
        duration.num_seconds(),
        duration.num_milliseconds().rem_euclid(1000)
    );
    tracing::info!(
        "Pages: {} discovered, {} fetched, {} hosts",
        stats.total_pages,
        stats.pages_fetched,
        stats.unique_hosts
    );

    for reason in SkipReason::all_reasons() {
        let count = stats.skipped(reason);
        if count > 0 {
            tracing::info!("  skipped ({}): {}", reason, count);
        }
    }

    tracing::info!(
        "Links: {} total ({} new, {} already known, {} malformed)",
        stats.total_links(),
        stats.child_links,
        stats.reference_links,
        stats.malformed_links
    );
    tracing::debug!("Workers completed: {}", stats.workers);
}
