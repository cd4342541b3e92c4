use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("BAKERY_ENV", "development"));
    let api_base_url = parse_base_url(&or_default("BAKERY_API_BASE_URL", "http://localhost:8000"))?;
    let log_level = or_default("BAKERY_LOG_LEVEL", "info");
    let session_path = PathBuf::from(or_default("BAKERY_SESSION_PATH", "./.bakery/session.json"));
    let request_timeout_secs = parse_u64("BAKERY_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("BAKERY_USER_AGENT", "bakery-client/0.1");
    let page_size = parse_page_size(&or_default(
        "BAKERY_PAGE_SIZE",
        &DEFAULT_PAGE_SIZE.to_string(),
    ))?;
    let whatsapp_number = lookup("BAKERY_WHATSAPP_NUMBER")
        .ok()
        .map(|raw| parse_whatsapp_number(&raw))
        .transpose()?;

    Ok(AppConfig {
        env,
        api_base_url,
        log_level,
        session_path,
        request_timeout_secs,
        user_agent,
        page_size,
        whatsapp_number,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty());
    if !has_scheme || !has_host {
        return Err(ConfigError::InvalidEnvVar {
            var: "BAKERY_API_BASE_URL".to_string(),
            reason: format!("expected an http(s) origin, got \"{raw}\""),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_page_size(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "BAKERY_PAGE_SIZE".to_string(),
        reason,
    };
    let size = raw.parse::<u32>().map_err(|e| invalid(e.to_string()))?;
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(invalid(format!("must be between 1 and {MAX_PAGE_SIZE}")));
    }
    Ok(size)
}

/// Strips the usual phone-number punctuation; wa.me wants bare digits.
fn parse_whatsapp_number(raw: &str) -> Result<String, ConfigError> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, '+' | ' ' | '-' | '(' | ')'))
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar {
            var: "BAKERY_WHATSAPP_NUMBER".to_string(),
            reason: format!("expected a phone number, got \"{raw}\""),
        });
    }
    Ok(digits)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
