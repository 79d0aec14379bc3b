// Miner telemetry models (GET /miner-data)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The whole fleet as served by `GET /miner-data`: miner name -> latest snapshot.
pub type FleetSnapshot = BTreeMap<String, MinerSnapshot>;

/// One miner's latest telemetry. Field spelling follows the backend wire; the
/// fleet mixes two firmware generations, so a few fields carry aliases for the
/// older spelling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerSnapshot {
    pub name: String,
    pub ip: String,
    /// Hardware family reported by the backend (e.g. "BG02", "NERDQ").
    #[serde(rename = "type")]
    pub kind: String,
    pub alive: bool,
    /// Free-text status from the backend, may embed emoji.
    pub status: String,
    /// TH/s over the last minute.
    pub hashrate_1m: f64,
    /// Long-window average in TH/s; older firmware reports `hashrate_24h`.
    #[serde(alias = "hashrate_24h")]
    pub hashrate_avg: f64,
    /// J/TH; lower is better.
    pub efficiency: f64,
    /// Board temperature in Celsius.
    pub temp: f64,
    #[serde(rename = "chipTemp")]
    pub chip_temp: f64,
    /// Watts at the wall.
    pub power: f64,
    pub voltage: f64,
    #[serde(rename = "fanrpm", alias = "fanSpeed")]
    pub fan_rpm: f64,
    #[serde(alias = "asicFreq")]
    pub frequency: f64,
    #[serde(rename = "sharesAccepted")]
    pub shares_accepted: u64,
    #[serde(rename = "sharesRejected")]
    pub shares_rejected: u64,
    #[serde(rename = "sharesStale", alias = "staleShares")]
    pub shares_stale: u64,
    #[serde(rename = "asicCount")]
    pub asic_count: u32,
    #[serde(rename = "asicTemps")]
    pub asic_temps: Vec<f64>,
    /// Seconds since the miner booted.
    pub uptime: u64,
}

impl MinerSnapshot {
    /// Hashrate shown on the card: the long-window average when reported,
    /// otherwise the 1-minute figure.
    pub fn display_hashrate(&self) -> f64 {
        if self.hashrate_avg != 0.0 {
            self.hashrate_avg
        } else {
            self.hashrate_1m
        }
    }

    /// Chip temperature with fallback to the board sensor for miners that
    /// report only one probe.
    pub fn display_chip_temp(&self) -> f64 {
        if self.chip_temp.is_nan() || self.chip_temp == 0.0 {
            self.temp
        } else {
            self.chip_temp
        }
    }

    /// Status text with a placeholder for miners that report nothing.
    pub fn status_label(&self) -> &str {
        if self.status.is_empty() {
            "Status Unknown"
        } else {
            &self.status
        }
    }

    pub fn status_class(&self) -> StatusClass {
        StatusClass::from_status(&self.status)
    }

    /// Per-ASIC temperatures are hidden for NERDQ units (single probe fans out
    /// as duplicate readings on that firmware).
    pub fn shows_asic_temps(&self) -> bool {
        self.kind != "NERDQ" && !self.asic_temps.is_empty()
    }
}

/// Coarse status bucket; matched on substrings because the backend embeds
/// emoji and free text in the status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    Ok,
    Hot,
    Reject,
    Offline,
}

impl StatusClass {
    pub fn from_status(status: &str) -> Self {
        let s = status.to_lowercase();
        if s.contains("heat") {
            StatusClass::Hot
        } else if s.contains("reject") {
            StatusClass::Reject
        } else if s.contains("offline") {
            StatusClass::Offline
        } else {
            StatusClass::Ok
        }
    }
}
