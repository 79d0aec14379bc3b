// History chart tests: per-timestamp folding, ordering, spotlight, meta line

use hashwatch::charts::*;
use hashwatch::models::{HistoryRow, HistorySummary};

fn row(timestamp: &str, name: &str, hashrate: f64, temp: f64, alive: bool) -> HistoryRow {
    HistoryRow {
        timestamp: timestamp.to_string(),
        name: name.to_string(),
        hashrate_1m: hashrate,
        temp,
        alive,
        ..HistoryRow::default()
    }
}

#[test]
fn series_folds_rows_sharing_a_timestamp() {
    let rows = vec![
        row("2025-08-20T10:00:00", "A", 11.0, 52.0, true),
        row("2025-08-20T10:00:00", "B", 0.5, 48.0, true),
        row("2025-08-20T10:05:00", "A", 11.2, 53.0, true),
    ];
    let series = build_series(&rows);
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].total_hashrate, 11.5);
    assert_eq!(series[0].avg_temp, 50.0);
    assert_eq!(series[1].total_hashrate, 11.2);
}

#[test]
fn series_sorts_by_parsed_time_not_arrival() {
    let rows = vec![
        row("2025-08-20T10:05:00", "A", 2.0, 50.0, true),
        row("2025-08-20T10:00:00", "A", 1.0, 50.0, true),
    ];
    let series = build_series(&rows);
    assert_eq!(series[0].total_hashrate, 1.0);
    assert_eq!(series[1].total_hashrate, 2.0);
}

#[test]
fn series_handles_offset_timestamps() {
    let rows = vec![
        row("2025-08-20T10:05:00+00:00", "A", 2.0, 50.0, true),
        row("2025-08-20T10:00:00+00:00", "A", 1.0, 50.0, true),
    ];
    let series = build_series(&rows);
    assert_eq!(series[0].total_hashrate, 1.0);
    assert_eq!(series[0].label, "10:00");
}

#[test]
fn zero_temps_do_not_drag_the_average() {
    let rows = vec![
        row("2025-08-20T10:00:00", "A", 1.0, 60.0, true),
        row("2025-08-20T10:00:00", "B", 1.0, 0.0, false),
    ];
    let series = build_series(&rows);
    assert_eq!(series[0].avg_temp, 60.0);
}

#[test]
fn all_zero_temps_report_zero() {
    let rows = vec![row("2025-08-20T10:00:00", "A", 1.0, 0.0, false)];
    let series = build_series(&rows);
    assert_eq!(series[0].avg_temp, 0.0);
}

#[test]
fn rows_without_timestamps_are_dropped() {
    let rows = vec![
        row("", "A", 1.0, 50.0, true),
        row("2025-08-20T10:00:00", "B", 2.0, 50.0, true),
    ];
    let series = build_series(&rows);
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].total_hashrate, 2.0);
}

#[test]
fn empty_rows_build_an_empty_series() {
    assert!(build_series(&[]).is_empty());
}

#[test]
fn spotlight_takes_top_miners_at_latest_timestamp() {
    let rows = vec![
        row("2025-08-20T10:00:00", "A", 99.0, 50.0, true),
        row("2025-08-20T10:05:00", "A", 11.0, 52.0, true),
        row("2025-08-20T10:05:00", "B", 0.5, 48.0, false),
        row("2025-08-20T10:05:00", "C", 5.0, 51.0, true),
    ];
    let summary = HistorySummary {
        latest_timestamp: Some("2025-08-20T10:05:00".to_string()),
        ..HistorySummary::default()
    };
    let entries = spotlight(&rows, &summary, 2);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "A");
    assert_eq!(entries[0].hashrate, 11.0);
    assert_eq!(entries[1].name, "C");
}

#[test]
fn spotlight_falls_back_to_last_row_timestamp() {
    let rows = vec![
        row("2025-08-20T10:00:00", "A", 1.0, 50.0, true),
        row("2025-08-20T10:05:00", "B", 2.0, 50.0, true),
    ];
    let entries = spotlight(&rows, &HistorySummary::default(), 5);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "B");
}

#[test]
fn spotlight_line_format() {
    let entry = SpotlightEntry {
        name: "BG02-1".to_string(),
        hashrate: 11.234,
        temp: 52.06,
        alive: true,
    };
    assert_eq!(entry.line(), "BG02-1: 11.23 TH/s \u{b7} 52.1 \u{b0}C \u{b7} online");
}

#[test]
fn meta_line_reports_samples_and_trend() {
    let summary = HistorySummary {
        latest_timestamp: None,
        fleet_avg_hash: Some(16.421),
        fleet_hash_trend: Some("up".to_string()),
    };
    assert_eq!(
        meta_line(288, &summary),
        "Samples loaded: 288. Fleet average 16.42 TH/s (up trend)."
    );
}

#[test]
fn meta_line_defaults_when_summary_is_bare() {
    assert_eq!(
        meta_line(0, &HistorySummary::default()),
        "Samples loaded: 0. Fleet average 0 TH/s (stable trend)."
    );
}
