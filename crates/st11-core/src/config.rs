use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse. All variables have
/// defaults, so a bare environment always loads.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
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

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got \"{other}\""),
            }),
        }
    };

    let headless = parse_bool("ST11_HEADLESS", "false")?;
    let viewport_width = parse_u32("ST11_VIEWPORT_WIDTH", "1920")?;
    let viewport_height = parse_u32("ST11_VIEWPORT_HEIGHT", "1080")?;
    let user_agent = or_default(
        "ST11_USER_AGENT",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
    );

    let nav_timeout_secs = parse_u64("ST11_NAV_TIMEOUT_SECS", "60")?;
    let selector_timeout_secs = parse_u64("ST11_SELECTOR_TIMEOUT_SECS", "30")?;
    let settle_delay_secs = parse_u64("ST11_SETTLE_DELAY_SECS", "2")?;

    let scroll_step_px = parse_u32("ST11_SCROLL_STEP_PX", "800")?;
    let scroll_pause_ms = parse_u64("ST11_SCROLL_PAUSE_MS", "500")?;
    let scroll_max_rounds = parse_u32("ST11_SCROLL_MAX_ROUNDS", "100")?;

    let image_timeout_secs = parse_u64("ST11_IMAGE_TIMEOUT_SECS", "10")?;
    let image_dir = PathBuf::from(or_default("ST11_IMAGE_DIR", "thumbnails"));
    let log_level = or_default("ST11_LOG_LEVEL", "info");

    Ok(AppConfig {
        headless,
        viewport_width,
        viewport_height,
        user_agent,
        nav_timeout_secs,
        selector_timeout_secs,
        settle_delay_secs,
        scroll_step_px,
        scroll_pause_ms,
        scroll_max_rounds,
        image_timeout_secs,
        image_dir,
        log_level,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
