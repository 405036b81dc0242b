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

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
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

    let or_default =
        |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_string()) };

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

    let upstream_base_url = require("LUSTRA_UPSTREAM_BASE_URL")?;
    let catalog_path = PathBuf::from(or_default("LUSTRA_CATALOG_PATH", "./config/catalog.yaml"));
    let log_level = or_default("LUSTRA_LOG_LEVEL", "info");
    let user_agent = or_default("LUSTRA_USER_AGENT", "lustra/0.1 (catalog-engine)");

    let request_timeout_secs = parse_u64("LUSTRA_REQUEST_TIMEOUT_SECS", "30")?;
    let timeout_max_retries = parse_u32("LUSTRA_TIMEOUT_MAX_RETRIES", "2")?;
    let timeout_retry_delay_ms = parse_u64("LUSTRA_TIMEOUT_RETRY_DELAY_MS", "1000")?;

    let buffer_page_size = parse_u32("LUSTRA_BUFFER_PAGE_SIZE", "2000")?;
    let buffer_max_fetches = parse_u32("LUSTRA_BUFFER_MAX_FETCHES", "3")?;
    let default_page_size = parse_u32("LUSTRA_DEFAULT_PAGE_SIZE", "40")?;

    Ok(AppConfig {
        upstream_base_url,
        catalog_path,
        log_level,
        user_agent,
        request_timeout_secs,
        timeout_max_retries,
        timeout_retry_delay_ms,
        buffer_page_size,
        buffer_max_fetches,
        default_page_size,
    })
}
