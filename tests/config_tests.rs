// Config loading and validation tests

use hashwatch::config::AppConfig;

const VALID_CONFIG: &str = r#"
[backend]
base_url = "http://127.0.0.1:8000"
ws_url = "ws://127.0.0.1:8000/ws"
request_timeout_ms = 3000

[polling]
miner_data_interval_ms = 5000
btc_price_interval_ms = 10000
history_interval_ms = 60000
history_limit = 720
stats_log_interval_secs = 60

[feed]
enabled = true
reconnect_delay_ms = 5000
fallback_poll_interval_ms = 10000

[display]
grid_slots = 9
gauge_max_hashrate = 10.0
power_cost_per_kwh = 0.13

[sample_log]
enabled = true
path = "data/samples.db"
sample_interval_ms = 300000
flush_rate = 24
retention_days = 3
seed_limit = 288

[assist]
provider = "smart"

[logging]
file = "hashwatch.log"
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.backend.base_url, "http://127.0.0.1:8000");
    assert_eq!(config.backend.ws_url, "ws://127.0.0.1:8000/ws");
    assert_eq!(config.polling.miner_data_interval_ms, 5000);
    assert_eq!(config.polling.history_limit, 720);
    assert!(config.feed.enabled);
    assert_eq!(config.display.grid_slots, 9);
    assert_eq!(config.sample_log.flush_rate, 24);
    assert_eq!(config.assist.provider, "smart");
    assert_eq!(config.logging.file, "hashwatch.log");
}

#[test]
fn test_config_defaults_for_optional_sections() {
    let trimmed = VALID_CONFIG
        .replace("[assist]\nprovider = \"smart\"\n", "")
        .replace("[logging]\nfile = \"hashwatch.log\"\n", "");
    let config = AppConfig::load_from_str(&trimmed).expect("load_from_str");
    assert_eq!(config.assist.provider, "smart");
    assert_eq!(config.logging.file, "hashwatch.log");
    assert_eq!(config.sample_log.retention_days, 3);
}

#[test]
fn test_config_validation_rejects_bad_base_url() {
    let bad = VALID_CONFIG.replace(
        "base_url = \"http://127.0.0.1:8000\"",
        "base_url = \"127.0.0.1:8000\"",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("backend.base_url"));
}

#[test]
fn test_config_validation_rejects_bad_ws_url_when_feed_enabled() {
    let bad = VALID_CONFIG.replace(
        "ws_url = \"ws://127.0.0.1:8000/ws\"",
        "ws_url = \"http://127.0.0.1:8000/ws\"",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("backend.ws_url"));
}

#[test]
fn test_config_allows_bad_ws_url_when_feed_disabled() {
    let cfg = VALID_CONFIG
        .replace("ws_url = \"ws://127.0.0.1:8000/ws\"", "ws_url = \"\"")
        .replace(
            "enabled = true\nreconnect_delay_ms",
            "enabled = false\nreconnect_delay_ms",
        );
    let config = AppConfig::load_from_str(&cfg).expect("load_from_str");
    assert!(!config.feed.enabled);
}

#[test]
fn test_config_validation_rejects_zero_poll_interval() {
    let bad = VALID_CONFIG.replace(
        "miner_data_interval_ms = 5000",
        "miner_data_interval_ms = 0",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("miner_data_interval_ms"));
}

#[test]
fn test_config_validation_rejects_zero_history_limit() {
    let bad = VALID_CONFIG.replace("history_limit = 720", "history_limit = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("history_limit"));
}

#[test]
fn test_config_validation_rejects_zero_gauge_max() {
    let bad = VALID_CONFIG.replace("gauge_max_hashrate = 10.0", "gauge_max_hashrate = 0.0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("gauge_max_hashrate"));
}

#[test]
fn test_config_validation_rejects_empty_sample_path_when_enabled() {
    let bad = VALID_CONFIG.replace("path = \"data/samples.db\"", "path = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("sample_log.path"));
}

#[test]
fn test_config_validation_rejects_zero_flush_rate() {
    let bad = VALID_CONFIG.replace("flush_rate = 24", "flush_rate = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("flush_rate"));
}

#[test]
fn test_config_validation_rejects_zero_reconnect_delay() {
    let bad = VALID_CONFIG.replace("reconnect_delay_ms = 5000", "reconnect_delay_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("reconnect_delay_ms"));
}
