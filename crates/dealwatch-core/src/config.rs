use std::path::PathBuf;

use crate::app_config::{AppConfig, ReplicaConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if env var values are invalid or the replica config
/// is only partially present.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if env var values are invalid or the replica config
/// is only partially present.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
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

    let deals_path = PathBuf::from(or_default("DEALWATCH_DEALS_PATH", "./data/deals.json"));
    let categories_path = PathBuf::from(or_default(
        "DEALWATCH_CATEGORIES_PATH",
        "./config/categories.yaml",
    ));
    let base_url = or_default("DEALWATCH_BASE_URL", "https://www.hktvmall.com");
    let search_api_url = or_default(
        "DEALWATCH_SEARCH_API_URL",
        "https://www.hktvmall.com/hktv/en/ajax/search_products",
    );

    let page_size = parse_u32("DEALWATCH_PAGE_SIZE", "600")?;
    let max_pages = parse_u32("DEALWATCH_MAX_PAGES", "100")?;
    let request_delay_ms = parse_u64("DEALWATCH_REQUEST_DELAY_MS", "2000")?;
    let request_timeout_secs = parse_u64("DEALWATCH_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("DEALWATCH_USER_AGENT", "dealwatch/0.1 (deal-tracker)");
    let max_retries = parse_u32("DEALWATCH_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("DEALWATCH_RETRY_BACKOFF_BASE_SECS", "1")?;
    let log_level = or_default("DEALWATCH_LOG_LEVEL", "info");

    let replica = build_replica_config(&lookup)?;

    Ok(AppConfig {
        deals_path,
        categories_path,
        base_url,
        search_api_url,
        page_size,
        max_pages,
        request_delay_ms,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        log_level,
        replica,
    })
}

/// Replication is opt-in: no endpoint means no replica config at all.
/// Once an endpoint is set, bucket and token become required so a typo
/// surfaces at startup instead of silently disabling uploads.
fn build_replica_config<F>(lookup: &F) -> Result<Option<ReplicaConfig>, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let Ok(endpoint) = lookup("DEALWATCH_REPLICA_ENDPOINT") else {
        return Ok(None);
    };

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let bucket = require("DEALWATCH_REPLICA_BUCKET")?;
    let access_token = require("DEALWATCH_REPLICA_TOKEN")?;
    let object_key =
        lookup("DEALWATCH_REPLICA_OBJECT_KEY").unwrap_or_else(|_| "deals.json".to_string());

    Ok(Some(ReplicaConfig {
        endpoint,
        bucket,
        access_token,
        object_key,
    }))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
