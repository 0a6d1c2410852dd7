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
fn build_app_config_loads_from_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let config = build_app_config(lookup_from_map(&map)).unwrap();

    // Defaults match the behavior the crawler was tuned against.
    assert!(!config.headless);
    assert_eq!(config.viewport_width, 1920);
    assert_eq!(config.viewport_height, 1080);
    assert_eq!(config.nav_timeout_secs, 60);
    assert_eq!(config.selector_timeout_secs, 30);
    assert_eq!(config.settle_delay_secs, 2);
    assert_eq!(config.scroll_step_px, 800);
    assert_eq!(config.scroll_pause_ms, 500);
    assert_eq!(config.scroll_max_rounds, 100);
    assert_eq!(config.image_timeout_secs, 10);
    assert_eq!(config.image_dir.to_str(), Some("thumbnails"));
    assert_eq!(config.log_level, "info");
}

#[test]
fn build_app_config_honors_overrides() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("ST11_HEADLESS", "true");
    map.insert("ST11_SCROLL_STEP_PX", "400");
    map.insert("ST11_SCROLL_MAX_ROUNDS", "10");
    map.insert("ST11_IMAGE_DIR", "/tmp/thumbs");

    let config = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(config.headless);
    assert_eq!(config.scroll_step_px, 400);
    assert_eq!(config.scroll_max_rounds, 10);
    assert_eq!(config.image_dir.to_str(), Some("/tmp/thumbs"));
}

#[test]
fn build_app_config_rejects_invalid_scroll_step() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("ST11_SCROLL_STEP_PX", "eight hundred");

    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ST11_SCROLL_STEP_PX"),
        "expected InvalidEnvVar(ST11_SCROLL_STEP_PX), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_headless_flag() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("ST11_HEADLESS", "maybe");

    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ST11_HEADLESS"),
        "expected InvalidEnvVar(ST11_HEADLESS), got: {result:?}"
    );
}

#[test]
fn build_app_config_accepts_numeric_bool_forms() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("ST11_HEADLESS", "1");
    assert!(build_app_config(lookup_from_map(&map)).unwrap().headless);

    map.insert("ST11_HEADLESS", "0");
    assert!(!build_app_config(lookup_from_map(&map)).unwrap().headless);
}

#[test]
fn duration_helpers_reflect_raw_fields() {
    let map: HashMap<&str, &str> = HashMap::new();
    let config = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(config.scroll_pause().as_millis(), 500);
    assert_eq!(config.nav_timeout().as_secs(), 60);
    assert_eq!(config.selector_timeout().as_secs(), 30);
}
