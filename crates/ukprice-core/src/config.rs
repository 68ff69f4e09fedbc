use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any env var has an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if any env var has an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The core parsing/validation logic is decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("UKPRICE_ENV", "development"));
    let log_level = or_default("UKPRICE_LOG_LEVEL", "info");
    let catalog_path = PathBuf::from(or_default("UKPRICE_CATALOG_PATH", "./config/catalog.yaml"));
    let sources_path = PathBuf::from(or_default("UKPRICE_SOURCES_PATH", "./config/sources.yaml"));
    let output_dir = PathBuf::from(or_default("UKPRICE_OUTPUT_DIR", "./data"));
    let history_window = parse_usize("UKPRICE_HISTORY_WINDOW", "52")?;

    let scraper_request_timeout_secs = parse_u64("UKPRICE_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("UKPRICE_SCRAPER_USER_AGENT", "ukprice/0.1 (price-tracker)");
    let scraper_max_concurrent_items = parse_usize("UKPRICE_SCRAPER_MAX_CONCURRENT_ITEMS", "1")?;
    let scraper_inter_request_delay_ms = parse_u64("UKPRICE_SCRAPER_INTER_REQUEST_DELAY_MS", "250")?;
    let scraper_max_retries = parse_u32("UKPRICE_SCRAPER_MAX_RETRIES", "3")?;
    let scraper_retry_backoff_base_secs = parse_u64("UKPRICE_SCRAPER_RETRY_BACKOFF_BASE_SECS", "5")?;
    let scraper_per_page = parse_u32("UKPRICE_SCRAPER_PER_PAGE", "50")?;

    Ok(AppConfig {
        env,
        log_level,
        catalog_path,
        sources_path,
        output_dir,
        history_window,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_concurrent_items,
        scraper_inter_request_delay_ms,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
        scraper_per_page,
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

    #[test]
    fn defaults_apply_with_empty_env() {
        let map = HashMap::new();
        let config = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(config.env, Environment::Development);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.history_window, 52);
        assert_eq!(config.scraper_max_retries, 3);
        assert_eq!(config.scraper_per_page, 50);
        assert_eq!(
            config.catalog_path.to_string_lossy(),
            "./config/catalog.yaml"
        );
    }

    #[test]
    fn env_overrides_are_honored() {
        let map = HashMap::from([
            ("UKPRICE_ENV", "production"),
            ("UKPRICE_LOG_LEVEL", "debug"),
            ("UKPRICE_OUTPUT_DIR", "/var/lib/ukprice"),
            ("UKPRICE_SCRAPER_MAX_CONCURRENT_ITEMS", "4"),
        ]);
        let config = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(config.env, Environment::Production);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.output_dir.to_string_lossy(), "/var/lib/ukprice");
        assert_eq!(config.scraper_max_concurrent_items, 4);
    }

    #[test]
    fn invalid_numeric_value_is_rejected() {
        let map = HashMap::from([("UKPRICE_HISTORY_WINDOW", "not-a-number")]);
        let err = build_app_config(lookup_from_map(&map)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "UKPRICE_HISTORY_WINDOW"));
    }

    #[test]
    fn unknown_environment_defaults_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
        assert_eq!(parse_environment("test"), Environment::Test);
    }

    #[test]
    fn environment_display() {
        assert_eq!(Environment::Production.to_string(), "production");
        assert_eq!(Environment::Development.to_string(), "development");
    }
}
