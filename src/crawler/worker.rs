//! Worker pool
//!
//! Each worker loops claim → scan → register until the frontier has nothing
//! claimable, then exits for good. There is no wake-up signal: a worker that
//! finds the frontier momentarily empty while another worker is mid-fetch
//! still exits, and the remaining workers pick up whatever that fetch adds.
//! The last worker can only exit once no page is pending and no fetch is in
//! flight, or the frontier has been closed.

use crate::crawler::frontier::Frontier;
use crate::crawler::scanner::Scanner;
use std::sync::Arc;

/// What one worker did before exiting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker_id: usize,

    /// Pages this worker claimed and scanned
    pub pages_scanned: usize,

    /// Links recorded on the pages it scanned (new and already known)
    pub links_recorded: usize,

    /// New pages created from those links
    pub pages_created: usize,

    /// Links dropped because they could not be parsed
    pub malformed_links: usize,
}

/// Fixed-size pool of crawl workers
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Creates a pool of `workers` workers (at least one)
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn size(&self) -> usize {
        self.workers
    }

    /// Runs every worker to completion
    ///
    /// Workers are spawned as tokio tasks and joined in order. A worker that
    /// panics is logged and left out of the returned reports; the others keep
    /// running.
    pub async fn run<S: Scanner>(
        &self,
        frontier: Arc<Frontier>,
        scanner: Arc<S>,
    ) -> Vec<WorkerReport> {
        let handles: Vec<_> = (0..self.workers)
            .map(|worker_id| {
                let frontier = Arc::clone(&frontier);
                let scanner = Arc::clone(&scanner);
                tokio::spawn(async move {
                    run_worker(worker_id, &frontier, scanner.as_ref()).await
                })
            })
            .collect();

        tracing::debug!("Spawned {} workers", handles.len());

        let mut reports = Vec::with_capacity(handles.len());
        for (worker_id, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => tracing::error!("Worker {} terminated abnormally: {}", worker_id, e),
            }
        }

        reports
    }
}

/// Single worker loop
async fn run_worker<S: Scanner>(
    worker_id: usize,
    frontier: &Frontier,
    scanner: &S,
) -> WorkerReport {
    let mut report = WorkerReport {
        worker_id,
        ..WorkerReport::default()
    };

    while let Some(page) = frontier.claim_next() {
        tracing::debug!(
            "Worker {} scanning {} (depth {})",
            worker_id,
            page.url,
            page.depth
        );

        let links = scanner.scan(&page.url).await;

        match frontier.register(page.id, links) {
            Ok(summary) => {
                report.pages_scanned += 1;
                report.links_recorded += summary.recorded();
                report.pages_created += summary.created;
                report.malformed_links += summary.malformed;
            }
            Err(e) => {
                // Only reachable if the claim protocol itself is broken
                tracing::error!(
                    "Worker {} failed to register {}: {}",
                    worker_id,
                    page.url,
                    e
                );
            }
        }
    }

    tracing::debug!(
        "Worker {} exiting after {} pages",
        worker_id,
        report.pages_scanned
    );

    report
}
