//! Page scanner: fetch a page and return the links on it
//!
//! The [`Scanner`] trait is the seam between the crawl engine and the
//! network. Workers only ever see a list of raw link strings; a page that
//! cannot be fetched simply yields no links.

use crate::config::HttpConfig;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchError};
use crate::crawler::parser::extract_links;
use reqwest::Client;
use std::future::Future;
use url::Url;

/// Source of the raw links found on a page
///
/// Implementations own no crawl state and must be safe to call concurrently
/// for different URLs. `scan` never fails: errors are reported on the
/// diagnostic stream and turn into an empty list.
pub trait Scanner: Send + Sync + 'static {
    fn scan(&self, url: &Url) -> impl Future<Output = Vec<String>> + Send;
}

/// Scanner that fetches pages over HTTP and extracts anchor `href`s
#[derive(Debug, Clone)]
pub struct HttpScanner {
    client: Client,
}

impl HttpScanner {
    /// Builds a scanner with its own HTTP client
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    /// Builds a scanner around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches a page and extracts its links, surfacing any fetch error
    pub async fn fetch_links(&self, url: &Url) -> Result<Vec<String>, FetchError> {
        let body = fetch_page(&self.client, url).await?;
        Ok(extract_links(&body))
    }
}

impl Scanner for HttpScanner {
    async fn scan(&self, url: &Url) -> Vec<String> {
        match self.fetch_links(url).await {
            Ok(links) => {
                tracing::debug!("Found {} links on {}", links.len(), url);
                links
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Vec::new()
            }
        }
    }
}
