// Historical metrics models (GET /historical-metrics)

use serde::{Deserialize, Serialize};

/// One persisted sample: a single miner at a single logging timestamp.
/// Rows sharing a timestamp string form one fleet-wide sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryRow {
    /// ISO-8601 timestamp the row was logged at.
    pub timestamp: String,
    pub name: String,
    pub hashrate_1m: f64,
    #[serde(alias = "hashrate_24h")]
    pub hashrate_avg: f64,
    pub power: f64,
    pub efficiency: f64,
    pub temp: f64,
    #[serde(rename = "chipTemp")]
    pub chip_temp: f64,
    #[serde(rename = "sharesAccepted")]
    pub shares_accepted: u64,
    #[serde(rename = "sharesRejected")]
    pub shares_rejected: u64,
    pub alive: bool,
}

/// Fleet-level rollup the backend computes over the returned window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySummary {
    pub latest_timestamp: Option<String>,
    pub fleet_avg_hash: Option<f64>,
    /// "up", "down" or "stable".
    pub fleet_hash_trend: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryResponse {
    pub success: bool,
    pub data: Vec<HistoryRow>,
    pub summary: HistorySummary,
    pub samples: u64,
    pub error: Option<String>,
}
