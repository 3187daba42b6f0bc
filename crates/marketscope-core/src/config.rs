use crate::app_config::{AppConfig, Environment, InferenceSettings};
use crate::ConfigError;

/// Read `MARKETSCOPE_*` settings, merging a `.env` file first when present.
///
/// # Errors
///
/// [`ConfigError::MissingEnvVar`] when inference is enabled without an API
/// key; [`ConfigError::InvalidEnvVar`] for values that do not parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Same as [`load_app_config`] but reads only the process environment.
///
/// # Errors
///
/// See [`load_app_config`].
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Pure settings builder; `lookup` stands in for `std::env::var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
        }
    };

    let env = parse_environment(&or_default("MARKETSCOPE_ENV", "development"));
    let bind_addr = parse_addr("MARKETSCOPE_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("MARKETSCOPE_LOG_LEVEL", "info");
    let catalog_path = lookup("MARKETSCOPE_CATALOG_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let fetch_timeout_secs = parse_u64("MARKETSCOPE_FETCH_TIMEOUT_SECS", "30")?;
    if fetch_timeout_secs == 0 {
        return Err(invalid(
            "MARKETSCOPE_FETCH_TIMEOUT_SECS",
            "timeout must be greater than zero".to_string(),
        ));
    }
    let fetch_user_agent = or_default(
        "MARKETSCOPE_FETCH_USER_AGENT",
        "marketscope/0.1 (market-insight)",
    );
    let fetch_max_body_bytes = parse_usize("MARKETSCOPE_FETCH_MAX_BODY_BYTES", "2097152")?;
    let content_max_chars = parse_usize("MARKETSCOPE_CONTENT_MAX_CHARS", "5000")?;

    let inference = if parse_bool("MARKETSCOPE_INFERENCE_ENABLED", "false")? {
        let api_key = require("OPENAI_API_KEY")?;
        let base_url = or_default("MARKETSCOPE_OPENAI_BASE_URL", "https://api.openai.com/v1")
            .trim_end_matches('/')
            .to_string();
        let model = or_default("MARKETSCOPE_OPENAI_MODEL", "gpt-4");
        let timeout_secs = parse_u64("MARKETSCOPE_INFERENCE_TIMEOUT_SECS", "60")?;
        if timeout_secs == 0 {
            return Err(invalid(
                "MARKETSCOPE_INFERENCE_TIMEOUT_SECS",
                "timeout must be greater than zero".to_string(),
            ));
        }
        let temperature = or_default("MARKETSCOPE_INFERENCE_TEMPERATURE", "0.3")
            .parse::<f32>()
            .map_err(|e| invalid("MARKETSCOPE_INFERENCE_TEMPERATURE", e.to_string()))?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(invalid(
                "MARKETSCOPE_INFERENCE_TEMPERATURE",
                format!("{temperature} is outside 0.0..=2.0"),
            ));
        }
        let max_tokens = parse_u32("MARKETSCOPE_INFERENCE_MAX_TOKENS", "2000")?;

        Some(InferenceSettings {
            api_key,
            base_url,
            model,
            timeout_secs,
            temperature,
            max_tokens,
        })
    } else {
        None
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalog_path,
        fetch_timeout_secs,
        fetch_user_agent,
        fetch_max_body_bytes,
        content_max_chars,
        inference,
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
#[path = "config_test.rs"]
mod tests;
