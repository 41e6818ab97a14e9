//! Sumi-Branch main entry point
//!
//! This is the command-line interface for the Sumi-Branch site mapper.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_branch::config::{load_config_with_hash, validate, Config, CrawlerOverrides};
use sumi_branch::output::{log_statistics, write_output};
use sumi_branch::Coordinator;
use tracing_subscriber::EnvFilter;

/// Sumi-Branch: a concurrent, depth-bounded site mapper
///
/// Crawls a website from a seed URL with a pool of workers and prints every
/// page it reached as a JSON tree of links on stdout.
#[derive(Parser, Debug)]
#[command(name = "sumi-branch")]
#[command(version)]
#[command(about = "A concurrent, depth-bounded site mapper", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from [default: http://golang.org/]
    #[arg(short = 'u', long = "url", value_name = "URL")]
    url: Option<String>,

    /// Maximum link depth to fetch [default: 1]
    #[arg(short = 'd', long = "depth", value_name = "DEPTH")]
    depth: Option<u32>,

    /// Number of concurrent workers [default: 2]
    #[arg(short = 'w', long = "workers", value_name = "N")]
    workers: Option<u32>,

    /// Also scan pages on hosts other than the seed's
    #[arg(short = 'f', long = "foreign")]
    foreign: bool,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> CrawlerOverrides {
        CrawlerOverrides {
            seed_url: self.url.clone(),
            max_depth: self.depth,
            workers: self.workers,
            scan_foreign: self.foreign,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;
    let output_config = config.output.clone();

    let coordinator = match Coordinator::new(config) {
        Ok(coordinator) => coordinator,
        Err(e) => {
            tracing::error!("Failed to start crawl: {}", e);
            return Err(e.into());
        }
    };

    let shutdown = coordinator.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing pages in flight");
            shutdown.trigger();
        }
    });

    let outcome = coordinator.run().await;
    log_statistics(&outcome.stats);

    write_output(std::io::stdout().lock(), &outcome.snapshot, &output_config)
        .context("Failed to write crawl output")?;

    Ok(())
}

/// Loads the optional config file, applies CLI overrides and validates
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    config.apply_overrides(cli.overrides());
    validate(&config).context("Invalid configuration")?;

    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Diagnostics go to stderr; stdout carries only the crawl result.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_branch=info,warn"),
            1 => EnvFilter::new("sumi_branch=debug,info"),
            2 => EnvFilter::new("sumi_branch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
