use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(parse_environment("development"), Environment::Development);
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test"), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_uses_defaults_when_env_is_empty() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");

    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.api_base_url, "http://localhost:8000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.session_path, PathBuf::from("./.bakery/session.json"));
    assert_eq!(cfg.request_timeout_secs, 10);
    assert_eq!(cfg.user_agent, "bakery-client/0.1");
    assert_eq!(cfg.page_size, 10);
    assert!(cfg.whatsapp_number.is_none());
}

#[test]
fn api_base_url_trailing_slash_is_trimmed() {
    let mut map = HashMap::new();
    map.insert("BAKERY_API_BASE_URL", "https://api.example.com/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_base_url, "https://api.example.com");
}

#[test]
fn api_base_url_without_scheme_is_rejected() {
    let mut map = HashMap::new();
    map.insert("BAKERY_API_BASE_URL", "api.example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BAKERY_API_BASE_URL"),
        "expected InvalidEnvVar(BAKERY_API_BASE_URL), got: {result:?}"
    );
}

#[test]
fn api_base_url_scheme_only_is_rejected() {
    let mut map = HashMap::new();
    map.insert("BAKERY_API_BASE_URL", "http://");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("BAKERY_REQUEST_TIMEOUT_SECS", "30");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 30);
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("BAKERY_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BAKERY_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(BAKERY_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn page_size_override_within_bounds() {
    let mut map = HashMap::new();
    map.insert("BAKERY_PAGE_SIZE", "50");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.page_size, 50);
}

#[test]
fn page_size_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("BAKERY_PAGE_SIZE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BAKERY_PAGE_SIZE"),
        "expected InvalidEnvVar(BAKERY_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn page_size_above_max_is_rejected() {
    let mut map = HashMap::new();
    map.insert("BAKERY_PAGE_SIZE", "51");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn whatsapp_number_punctuation_is_stripped() {
    let mut map = HashMap::new();
    map.insert("BAKERY_WHATSAPP_NUMBER", "+977 (980) 123-4567");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.whatsapp_number.as_deref(), Some("9779801234567"));
}

#[test]
fn whatsapp_number_with_letters_is_rejected() {
    let mut map = HashMap::new();
    map.insert("BAKERY_WHATSAPP_NUMBER", "call-me");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BAKERY_WHATSAPP_NUMBER"),
        "expected InvalidEnvVar(BAKERY_WHATSAPP_NUMBER), got: {result:?}"
    );
}

#[test]
fn debug_output_hides_whatsapp_number() {
    let mut map = HashMap::new();
    map.insert("BAKERY_WHATSAPP_NUMBER", "9779801234567");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("9779801234567"), "number leaked: {debug}");
    assert!(debug.contains("[set]"));
}
