use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub polling: PollingConfig,
    pub feed: FeedConfig,
    pub display: DisplayConfig,
    pub sample_log: SampleLogConfig,
    #[serde(default)]
    pub assist: AssistConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// REST base, e.g. "http://192.168.1.20:8000".
    pub base_url: String,
    /// Live feed endpoint, e.g. "ws://192.168.1.20:8000/ws".
    pub ws_url: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    pub miner_data_interval_ms: u64,
    pub btc_price_interval_ms: u64,
    pub history_interval_ms: u64,
    /// Row window requested from /historical-metrics.
    pub history_limit: u32,
    /// How often to log app stats (polls, stale discards, feed reconnects) at INFO level.
    pub stats_log_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub enabled: bool,
    pub reconnect_delay_ms: u64,
    /// /api/stats poll cadence while the socket is down.
    pub fallback_poll_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Rack capacity; open slots below this render as placeholders.
    pub grid_slots: usize,
    /// Full-scale TH/s for the per-miner gauge.
    pub gauge_max_hashrate: f64,
    /// USD per kWh for the projected cost panel.
    pub power_cost_per_kwh: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SampleLogConfig {
    pub enabled: bool,
    pub path: String,
    pub sample_interval_ms: u64,
    pub flush_rate: u64,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// Rows read back at startup to seed the charts before the backend answers.
    pub seed_limit: u32,
}

fn default_retention_days() -> u32 {
    3
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistConfig {
    pub provider: String,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            provider: "smart".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log file path; stdout/stderr belong to the terminal UI.
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: "hashwatch.log".into(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.backend.base_url.starts_with("http://") || self.backend.base_url.starts_with("https://"),
            "backend.base_url must start with http:// or https://, got {:?}",
            self.backend.base_url
        );
        anyhow::ensure!(
            !self.feed.enabled
                || self.backend.ws_url.starts_with("ws://")
                || self.backend.ws_url.starts_with("wss://"),
            "backend.ws_url must start with ws:// or wss:// when the feed is enabled, got {:?}",
            self.backend.ws_url
        );
        anyhow::ensure!(
            self.backend.request_timeout_ms > 0,
            "backend.request_timeout_ms must be > 0, got {}",
            self.backend.request_timeout_ms
        );
        anyhow::ensure!(
            self.polling.miner_data_interval_ms > 0,
            "polling.miner_data_interval_ms must be > 0, got {}",
            self.polling.miner_data_interval_ms
        );
        anyhow::ensure!(
            self.polling.btc_price_interval_ms > 0,
            "polling.btc_price_interval_ms must be > 0, got {}",
            self.polling.btc_price_interval_ms
        );
        anyhow::ensure!(
            self.polling.history_interval_ms > 0,
            "polling.history_interval_ms must be > 0, got {}",
            self.polling.history_interval_ms
        );
        anyhow::ensure!(
            self.polling.history_limit > 0,
            "polling.history_limit must be > 0, got {}",
            self.polling.history_limit
        );
        anyhow::ensure!(
            self.polling.stats_log_interval_secs > 0,
            "polling.stats_log_interval_secs must be > 0, got {}",
            self.polling.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.feed.reconnect_delay_ms > 0,
            "feed.reconnect_delay_ms must be > 0, got {}",
            self.feed.reconnect_delay_ms
        );
        anyhow::ensure!(
            self.feed.fallback_poll_interval_ms > 0,
            "feed.fallback_poll_interval_ms must be > 0, got {}",
            self.feed.fallback_poll_interval_ms
        );
        anyhow::ensure!(
            self.display.grid_slots > 0,
            "display.grid_slots must be > 0, got {}",
            self.display.grid_slots
        );
        anyhow::ensure!(
            self.display.gauge_max_hashrate > 0.0,
            "display.gauge_max_hashrate must be > 0, got {}",
            self.display.gauge_max_hashrate
        );
        anyhow::ensure!(
            self.display.power_cost_per_kwh >= 0.0,
            "display.power_cost_per_kwh must be >= 0, got {}",
            self.display.power_cost_per_kwh
        );
        anyhow::ensure!(
            !self.sample_log.enabled || !self.sample_log.path.is_empty(),
            "sample_log.path must be non-empty when sample_log.enabled is true"
        );
        anyhow::ensure!(
            self.sample_log.sample_interval_ms > 0,
            "sample_log.sample_interval_ms must be > 0, got {}",
            self.sample_log.sample_interval_ms
        );
        anyhow::ensure!(
            self.sample_log.flush_rate > 0,
            "sample_log.flush_rate must be > 0, got {}",
            self.sample_log.flush_rate
        );
        anyhow::ensure!(
            self.sample_log.retention_days > 0,
            "sample_log.retention_days must be > 0, got {}",
            self.sample_log.retention_days
        );
        anyhow::ensure!(
            self.sample_log.seed_limit > 0,
            "sample_log.seed_limit must be > 0, got {}",
            self.sample_log.seed_limit
        );
        anyhow::ensure!(
            !self.assist.provider.is_empty(),
            "assist.provider must be non-empty"
        );
        anyhow::ensure!(
            !self.logging.file.is_empty(),
            "logging.file must be non-empty"
        );
        Ok(())
    }
}
