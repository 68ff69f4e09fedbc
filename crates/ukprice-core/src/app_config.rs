use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide configuration, loaded from `UKPRICE_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Path to the catalog YAML (brand / name / pack size rows).
    pub catalog_path: PathBuf,
    /// Path to the retail source list YAML.
    pub sources_path: PathBuf,
    /// Directory where prices.json, price_history.json and the JS export land.
    pub output_dir: PathBuf,
    /// Rolling history entries retained per catalog item.
    pub history_window: usize,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    /// Catalog items processed concurrently.
    pub scraper_max_concurrent_items: usize,
    pub scraper_inter_request_delay_ms: u64,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
    /// Results requested per search query.
    pub scraper_per_page: u32,
}
