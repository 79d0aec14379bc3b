// History series building. Rows arrive one-per-miner-per-timestamp; charts
// want one point per timestamp with the fleet summed up.

use crate::models::{HistoryRow, HistorySummary};
use chrono::{DateTime, NaiveDateTime};

/// One plotted sample: every row sharing a timestamp folded together.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// HH:MM tick label.
    pub label: String,
    /// Fleet hashrate sum, TH/s.
    pub total_hashrate: f64,
    /// Mean over the reporting temperature probes; 0 when none reported.
    pub avg_temp: f64,
}

/// Miner line in the latest-sample spotlight.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotlightEntry {
    pub name: String,
    pub hashrate: f64,
    pub temp: f64,
    pub alive: bool,
}

impl SpotlightEntry {
    pub fn line(&self) -> String {
        format!(
            "{}: {:.2} TH/s · {:.1} °C · {}",
            self.name,
            self.hashrate,
            self.temp,
            if self.alive { "online" } else { "offline" }
        )
    }
}

pub const NO_SAMPLES_NOTE: &str = "No miner samples available yet.";

/// Fold rows into chronological per-timestamp points. Rows without a
/// timestamp are dropped; zero temperatures do not drag the average down.
pub fn build_series(rows: &[HistoryRow]) -> Vec<ChartPoint> {
    struct Bucket {
        timestamp: String,
        total_hash: f64,
        temps: Vec<f64>,
    }

    let mut order: Vec<String> = Vec::new();
    let mut buckets: std::collections::HashMap<String, Bucket> = std::collections::HashMap::new();
    for row in rows {
        if row.timestamp.is_empty() {
            continue;
        }
        let bucket = buckets
            .entry(row.timestamp.clone())
            .or_insert_with(|| {
                order.push(row.timestamp.clone());
                Bucket {
                    timestamp: row.timestamp.clone(),
                    total_hash: 0.0,
                    temps: Vec::new(),
                }
            });
        bucket.total_hash += row.hashrate_1m;
        if row.temp != 0.0 {
            bucket.temps.push(row.temp);
        }
    }

    let mut ordered: Vec<Bucket> = order
        .into_iter()
        .filter_map(|ts| buckets.remove(&ts))
        .collect();
    ordered.sort_by_key(|b| parse_timestamp(&b.timestamp));

    ordered
        .into_iter()
        .map(|b| {
            let avg_temp = if b.temps.is_empty() {
                0.0
            } else {
                b.temps.iter().sum::<f64>() / b.temps.len() as f64
            };
            ChartPoint {
                label: tick_label(&b.timestamp),
                total_hashrate: round2(b.total_hash),
                avg_temp: round2(avg_temp),
            }
        })
        .collect()
}

/// Top miners at the newest timestamp, best hashrate first. The summary's
/// latest_timestamp wins; without one, the last row's timestamp is used.
pub fn spotlight(rows: &[HistoryRow], summary: &HistorySummary, top: usize) -> Vec<SpotlightEntry> {
    let latest = summary
        .latest_timestamp
        .clone()
        .or_else(|| rows.last().map(|r| r.timestamp.clone()));
    let Some(latest) = latest else {
        return Vec::new();
    };

    let mut entries: Vec<SpotlightEntry> = rows
        .iter()
        .filter(|r| r.timestamp == latest)
        .map(|r| SpotlightEntry {
            name: r.name.clone(),
            hashrate: r.hashrate_1m,
            temp: r.temp,
            alive: r.alive,
        })
        .collect();
    entries.sort_by(|a, b| b.hashrate.total_cmp(&a.hashrate));
    entries.truncate(top);
    entries
}

/// Footer under the charts, e.g.
/// "Samples loaded: 288. Fleet average 16.42 TH/s (stable trend)."
pub fn meta_line(samples: u64, summary: &HistorySummary) -> String {
    let avg = match summary.fleet_avg_hash {
        Some(v) => format!("{v:.2}"),
        None => "0".to_string(),
    };
    let trend = summary.fleet_hash_trend.as_deref().unwrap_or("stable");
    format!("Samples loaded: {samples}. Fleet average {avg} TH/s ({trend} trend).")
}

/// Backend timestamps are RFC 3339 with offset; the local logger writes
/// naive ones. Unparseable strings sort first and keep their raw label.
fn parse_timestamp(ts: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc().timestamp_millis());
    }
    None
}

fn tick_label(ts: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return dt.format("%H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%H:%M").to_string();
    }
    ts.to_string()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
