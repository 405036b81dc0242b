use std::path::PathBuf;

/// Application configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the upstream product service.
    pub upstream_base_url: String,
    /// Path to the static catalog taxonomy file.
    pub catalog_path: PathBuf,
    pub log_level: String,
    pub user_agent: String,
    /// Per-request timeout for upstream calls.
    pub request_timeout_secs: u64,
    /// Additional attempts after a timed-out upstream request.
    pub timeout_max_retries: u32,
    /// Fixed delay between timeout retries.
    pub timeout_retry_delay_ms: u64,
    /// Enlarged page size used by buffered-mode aggregation to approximate
    /// "all products in this category".
    pub buffer_page_size: u32,
    /// Maximum upstream page fetches per buffered-mode aggregation.
    pub buffer_max_fetches: u32,
    /// Page size shown to the shopper.
    pub default_page_size: u32,
}
