//! Environment configuration, loaded once at process start and passed into
//! the handlers at construction time.

use thiserror::Error;

use cristin_client::DEFAULT_BASE_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Value of the `Access-Control-Allow-Origin` header on every response.
    pub allowed_origin: String,
    /// Base URL of the upstream Cristin API.
    pub cristin_base_url: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

/// Load configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env
/// vars.
///
/// # Errors
///
/// Returns `ConfigError` if `ALLOWED_ORIGIN` is missing or a value is
/// invalid.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// The parsing logic is decoupled from the actual environment so it can be
/// tested with a pure `HashMap` lookup.
fn build_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default =
        |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_string()) };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let allowed_origin = require("ALLOWED_ORIGIN")?;
    let cristin_base_url = or_default("CRISTIN_API_URL", DEFAULT_BASE_URL);
    let request_timeout_secs = parse_u64("CRISTIN_REQUEST_TIMEOUT_SECS", "30")?;
    let log_level = or_default("CRISTIN_LOG_LEVEL", "info");

    Ok(AppConfig {
        allowed_origin,
        cristin_base_url,
        request_timeout_secs,
        log_level,
    })
}

#[cfg(test)]
mod tests {
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

    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("ALLOWED_ORIGIN", "*");
        m
    }

    #[test]
    fn build_config_fails_without_allowed_origin() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "ALLOWED_ORIGIN"),
            "expected MissingEnvVar(ALLOWED_ORIGIN), got: {result:?}"
        );
    }

    #[test]
    fn build_config_applies_defaults() {
        let map = full_env();
        let config = build_config(lookup_from_map(&map)).expect("config");
        assert_eq!(config.allowed_origin, "*");
        assert_eq!(config.cristin_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn build_config_accepts_overrides() {
        let mut map = full_env();
        map.insert("CRISTIN_API_URL", "http://localhost:9000/v2");
        map.insert("CRISTIN_REQUEST_TIMEOUT_SECS", "5");
        map.insert("CRISTIN_LOG_LEVEL", "debug");
        let config = build_config(lookup_from_map(&map)).expect("config");
        assert_eq!(config.cristin_base_url, "http://localhost:9000/v2");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn build_config_rejects_non_numeric_timeout() {
        let mut map = full_env();
        map.insert("CRISTIN_REQUEST_TIMEOUT_SECS", "not-a-number");
        let result = build_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CRISTIN_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(CRISTIN_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }
}
