//! Configuration module for Sumi-Branch
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, and merging command-line overrides on top of it.
//!
//! # Example
//!
//! ```no_run
//! use sumi_branch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, CrawlerOverrides, HttpConfig, OutputConfig, OutputFormat,
    DEFAULT_SEED_URL,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, MAX_WORKERS};
