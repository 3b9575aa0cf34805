use std::path::PathBuf;

/// Application configuration, read from `DEMANDPULSE_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the post-search service.
    pub source_base_url: String,
    pub log_level: String,
    /// Path to the default products file (YAML).
    pub products_path: PathBuf,
    /// Path to the world-cities dataset (CSV, `name` column).
    pub cities_path: PathBuf,
    /// Path to the countries dataset (CSV, `Name` column).
    pub countries_path: PathBuf,
    pub source_request_timeout_secs: u64,
    pub source_user_agent: String,
    /// Posts requested per batch from the source.
    pub source_page_size: u32,
    pub source_max_retries: u32,
    pub source_retry_backoff_base_secs: u64,
}
