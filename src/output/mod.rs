//! Output module for rendering crawl results
//!
//! This module handles:
//! - Rendering the finished frontier as a JSON link tree or a flat URL list
//! - Writing the rendered JSON to any `Write` sink (stdout in the binary)
//! - Summarising and logging crawl statistics

pub mod stats;
mod tree;

pub use stats::{log_statistics, CrawlStatistics};
pub use tree::{build_tree, url_list, PageNode};

use crate::config::{OutputConfig, OutputFormat};
use crate::crawler::FrontierSnapshot;
use crate::CrawlError;
use serde::Serialize;
use std::io::Write;

/// Renders the frontier as a JSON document
///
/// # Arguments
///
/// * `snapshot` - The finished frontier
/// * `config` - Output format and pretty-printing settings
///
/// # Returns
///
/// * `Ok(String)` - The JSON document, without a trailing newline
/// * `Err(CrawlError::Serialization)` - Serialization failed
pub fn render(snapshot: &FrontierSnapshot, config: &OutputConfig) -> Result<String, CrawlError> {
    match config.format {
        OutputFormat::Tree => to_json(&build_tree(snapshot), config.pretty),
        OutputFormat::Urls => to_json(&url_list(snapshot), config.pretty),
    }
}

/// Renders the frontier and writes it, followed by a newline
pub fn write_output<W: Write>(
    mut writer: W,
    snapshot: &FrontierSnapshot,
    config: &OutputConfig,
) -> Result<(), CrawlError> {
    let json = render(snapshot, config)?;
    writeln!(writer, "{}", json)?;
    writer.flush()?;
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, CrawlError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
