use crate::app_config::{AppConfig, BrowserSettings, GeocoderSettings};
use crate::ConfigError;

const DEFAULT_BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/115.0";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but its value is invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but its value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable config.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
        }
    };

    let parse_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Ok(trimmed.to_string())
        } else {
            Err(invalid(
                var,
                format!("expected an http(s) URL, got \"{trimmed}\""),
            ))
        }
    };

    let log_level = or_default("MAPSCOUT_LOG_LEVEL", "info");

    let browser = BrowserSettings {
        webdriver_url: parse_url("MAPSCOUT_WEBDRIVER_URL", "http://localhost:4444")?,
        command_timeout_secs: parse_u64("MAPSCOUT_WEBDRIVER_TIMEOUT_SECS", "60")?,
        headless: parse_bool("MAPSCOUT_BROWSER_HEADLESS", "true")?,
        user_agent: or_default("MAPSCOUT_BROWSER_USER_AGENT", DEFAULT_BROWSER_USER_AGENT),
        language: or_default("MAPSCOUT_BROWSER_LANGUAGE", "en-US"),
    };

    let geocoder = GeocoderSettings {
        base_url: parse_url(
            "MAPSCOUT_GEOCODER_URL",
            "https://nominatim.openstreetmap.org/",
        )?,
        user_agent: or_default(
            "MAPSCOUT_GEOCODER_USER_AGENT",
            "mapscout/0.1 (place-discovery)",
        ),
        timeout_secs: parse_u64("MAPSCOUT_GEOCODER_TIMEOUT_SECS", "30")?,
        max_retries: parse_u32("MAPSCOUT_GEOCODER_MAX_RETRIES", "2")?,
        backoff_base_ms: parse_u64("MAPSCOUT_GEOCODER_BACKOFF_BASE_MS", "1000")?,
    };

    let maps_base_url = parse_url("MAPSCOUT_MAPS_BASE_URL", "https://www.google.com/maps")?;
    let max_scroll_attempts = parse_u32("MAPSCOUT_MAX_SCROLL_ATTEMPTS", "40")?;
    let stall_retry_limit = parse_u32("MAPSCOUT_STALL_RETRY_LIMIT", "5")?;
    let results_timeout_secs = parse_u64("MAPSCOUT_RESULTS_TIMEOUT_SECS", "30")?;
    let sidebar_timeout_secs = parse_u64("MAPSCOUT_SIDEBAR_TIMEOUT_SECS", "30")?;
    let selectors_path = lookup("MAPSCOUT_SELECTORS_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        log_level,
        browser,
        geocoder,
        maps_base_url,
        max_scroll_attempts,
        stall_retry_limit,
        results_timeout_secs,
        sidebar_timeout_secs,
        selectors_path,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
