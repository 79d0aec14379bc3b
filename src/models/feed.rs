// Live feed models (WS /ws, GET /api/stats fallback)

use serde::{Deserialize, Serialize};

/// One push from the live feed. Sections are optional so a partial message
/// updates only the panels it carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedMessage {
    pub asic_stats: Option<AsicStats>,
    pub network_stats: Option<NetworkStats>,
    pub luxor_stats: Option<LuxorStats>,
    pub chip_temps: Vec<ChipTemp>,
}

impl FeedMessage {
    pub fn is_empty(&self) -> bool {
        self.asic_stats.is_none()
            && self.network_stats.is_none()
            && self.luxor_stats.is_none()
            && self.chip_temps.is_empty()
    }
}

/// Aggregate ASIC telemetry from the reference rig.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsicStats {
    /// TH/s.
    pub hashrate: f64,
    pub temperature: f64,
    pub fan_speed: u32,
    /// Watts.
    pub power_usage: f64,
    pub uptime: u64,
    pub accepted_shares: u64,
    pub rejected_shares: u64,
    pub hw_errors: u64,
    pub pool_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkStats {
    /// Milliseconds.
    pub latency: f64,
    /// Percent.
    pub packet_loss: f64,
    pub bandwidth_up: f64,
    pub bandwidth_down: f64,
    pub connection_status: String,
}

/// Pool-side numbers reported by Luxor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LuxorStats {
    pub hashrate_1h: f64,
    pub hashrate_24h: f64,
    pub workers_online: u32,
    pub efficiency: f64,
    /// BTC earned over the trailing 24 hours.
    pub revenue_24h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChipTemp {
    pub chip_id: u32,
    pub temperature: f64,
    #[serde(default)]
    pub status: ChipStatus,
}

/// Per-chip thermal bucket as graded by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipStatus {
    #[default]
    Normal,
    Warning,
    Critical,
    #[serde(other)]
    Unknown,
}
