use serde::Deserialize;

/// Default seed when neither the config file nor the command line names one
pub const DEFAULT_SEED_URL: &str = "http://golang.org/";

/// Main configuration structure for Sumi-Branch
///
/// Every section is optional in the TOML file; missing sections and keys
/// fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrawlerConfig {
    /// URL the crawl starts from
    #[serde(rename = "seed-url", default = "default_seed_url")]
    pub seed_url: String,

    /// Maximum depth to crawl from the seed; pages at this depth are recorded
    /// but never fetched
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Number of concurrent workers
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Whether pages on a different host than the seed may be fetched
    #[serde(rename = "scan-foreign", default)]
    pub scan_foreign: bool,

    /// Stop handing out new pages after this many seconds
    #[serde(rename = "deadline-secs", default)]
    pub deadline_secs: Option<u64>,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Total request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Shape of the JSON written to stdout
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print the JSON
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

/// Shape of the crawl result on stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Nested page objects rooted at the seed
    #[default]
    Tree,
    /// Flat array of every canonical URL in discovery order
    Urls,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: default_seed_url(),
            max_depth: default_max_depth(),
            workers: default_workers(),
            scan_foreign: false,
            deadline_secs: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            pretty: default_pretty(),
        }
    }
}

fn default_seed_url() -> String {
    DEFAULT_SEED_URL.to_string()
}

fn default_max_depth() -> u32 {
    1
}

fn default_workers() -> u32 {
    2
}

fn default_user_agent() -> String {
    format!("sumi-branch/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_pretty() -> bool {
    true
}

/// Values given on the command line; each one that is set wins over the
/// config file
#[derive(Debug, Clone, Default)]
pub struct CrawlerOverrides {
    pub seed_url: Option<String>,
    pub max_depth: Option<u32>,
    pub workers: Option<u32>,
    pub scan_foreign: bool,
}

impl Config {
    /// Applies command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&mut self, overrides: CrawlerOverrides) {
        if let Some(seed_url) = overrides.seed_url {
            self.crawler.seed_url = seed_url;
        }
        if let Some(max_depth) = overrides.max_depth {
            self.crawler.max_depth = max_depth;
        }
        if let Some(workers) = overrides.workers {
            self.crawler.workers = workers;
        }
        if overrides.scan_foreign {
            self.crawler.scan_foreign = true;
        }
    }
}
