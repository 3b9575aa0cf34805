use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the actual environment so it
/// can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let source_base_url = require("DEMANDPULSE_SOURCE_BASE_URL")?;

    let log_level = or_default("DEMANDPULSE_LOG_LEVEL", "info");
    let products_path = PathBuf::from(or_default(
        "DEMANDPULSE_PRODUCTS_PATH",
        "./config/products.yaml",
    ));
    let cities_path = PathBuf::from(or_default(
        "DEMANDPULSE_CITIES_PATH",
        "./data/world_cities.csv",
    ));
    let countries_path = PathBuf::from(or_default(
        "DEMANDPULSE_COUNTRIES_PATH",
        "./data/countries.csv",
    ));

    let source_request_timeout_secs = parse_u64("DEMANDPULSE_SOURCE_REQUEST_TIMEOUT_SECS", "30")?;
    let source_user_agent = or_default(
        "DEMANDPULSE_SOURCE_USER_AGENT",
        "demandpulse/0.1 (sentiment-analytics)",
    );
    let source_page_size = parse_u32("DEMANDPULSE_SOURCE_PAGE_SIZE", "100")?;
    let source_max_retries = parse_u32("DEMANDPULSE_SOURCE_MAX_RETRIES", "3")?;
    let source_retry_backoff_base_secs =
        parse_u64("DEMANDPULSE_SOURCE_RETRY_BACKOFF_BASE_SECS", "5")?;

    Ok(AppConfig {
        source_base_url,
        log_level,
        products_path,
        cities_path,
        countries_path,
        source_request_timeout_secs,
        source_user_agent,
        source_page_size,
        source_max_retries,
        source_retry_backoff_base_secs,
    })
}
