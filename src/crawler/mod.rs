//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The shared frontier and its claim/register protocol
//! - HTTP fetching and HTML link extraction behind the `Scanner` trait
//! - The worker pool
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod scanner;
mod worker;

pub use coordinator::{Coordinator, CrawlOutcome, ShutdownHandle};
pub use fetcher::{build_http_client, fetch_page, FetchError};
pub use frontier::{
    ClaimedPage, Frontier, FrontierSnapshot, Link, Page, PageId, RegisterSummary, ROOT,
};
pub use parser::extract_links;
pub use scanner::{HttpScanner, Scanner};
pub use worker::{WorkerPool, WorkerReport};

use crate::config::Config;
use crate::CrawlError;

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Parse the seed URL
/// 2. Build the HTTP client
/// 3. Run the worker pool until nothing is left to claim
/// 4. Return the finished frontier and statistics
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl completed
/// * `Err(CrawlError)` - The crawl could not be started
pub async fn crawl(config: Config) -> Result<CrawlOutcome, CrawlError> {
    Ok(Coordinator::new(config)?.run().await)
}
