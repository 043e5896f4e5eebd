use crate::app_config::{AppConfig, Environment};
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
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// All parsing and validation lives here so tests can drive it with a plain
/// `HashMap` lookup instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty strings count as unset for optional secrets and cron expressions.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
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

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("TRENDFEED_ENV", "development"))?;

    let bind_addr = parse("TRENDFEED_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("TRENDFEED_LOG_LEVEL", "info");
    let api_key_hash_salt = optional("TRENDFEED_API_KEY_HASH_SALT");

    let db_max_connections = parse_u32("TRENDFEED_DB_MAX_CONNECTIONS", "4")?;
    let db_min_connections = parse_u32("TRENDFEED_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("TRENDFEED_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let openai_api_key = optional("OPENAI_API_KEY");
    let openai_model = or_default("OPENAI_MODEL", "gpt-4o");
    let openai_base_url = or_default("OPENAI_BASE_URL", "https://api.openai.com/v1");
    let llm_connect_timeout_secs = parse_u64("TRENDFEED_LLM_CONNECT_TIMEOUT_SECS", "10")?;
    let llm_timeout_secs = parse_u64("TRENDFEED_LLM_TIMEOUT_SECS", "120")?;

    let serpapi_api_key = optional("SERPAPI_API_KEY");
    let http_connect_timeout_secs = parse_u64("TRENDFEED_HTTP_CONNECT_TIMEOUT_SECS", "5")?;
    let http_timeout_secs = parse_u64("TRENDFEED_HTTP_TIMEOUT_SECS", "20")?;
    let scraper_user_agent = or_default(
        "TRENDFEED_SCRAPER_USER_AGENT",
        "Mozilla/5.0 (compatible; trendfeed/0.1)",
    );

    let rss_title = or_default("RSS_TITLE", "Internal Trend Feed");
    let rss_link = or_default("RSS_LINK", "https://example.com");
    let rss_description = or_default("RSS_DESCRIPTION", "Auto-generated RSS feed");

    let longform_target_len = parse_u32("TRENDFEED_LONGFORM_TARGET_LEN", "8000")?;
    let longform_min_floor = parse_u32("TRENDFEED_LONGFORM_MIN_FLOOR", "3000")?;
    let feed_max_items = parse_usize("TRENDFEED_FEED_MAX_ITEMS", "3")?;
    if feed_max_items == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TRENDFEED_FEED_MAX_ITEMS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let trends_cron = optional("TRENDFEED_TRENDS_CRON");
    let ranking_cron = optional("TRENDFEED_RANKING_CRON");

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        api_key_hash_salt,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        openai_api_key,
        openai_model,
        openai_base_url,
        llm_connect_timeout_secs,
        llm_timeout_secs,
        serpapi_api_key,
        http_connect_timeout_secs,
        http_timeout_secs,
        scraper_user_agent,
        rss_title,
        rss_link,
        rss_description,
        longform_target_len,
        longform_min_floor,
        feed_max_items,
        trends_cron,
        ranking_cron,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TRENDFEED_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
