// Dashboard rendering tests: draw into a test backend and scan the buffer.

use chrono::Local;
use hashwatch::models::{
    AsicStats, ChipStatus, ChipTemp, HistoryRow, HistorySummary, LuxorStats, MinerSnapshot,
};
use hashwatch::store::{
    DashboardState, HistoryView, JournalEntry, JournalLevel, LiveFeed, PriceQuote, StoreCounters,
};
use hashwatch::tui::app::{App, PromptMode};
use hashwatch::tui::{TuiConfig, ui};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::collections::BTreeMap;
use std::sync::Arc;

fn config() -> TuiConfig {
    TuiConfig {
        grid_slots: 9,
        gauge_max_hashrate: 10.0,
        power_cost_per_kwh: 0.13,
        assist_provider: "smart".to_string(),
        feed_enabled: true,
    }
}

fn render(app: &App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| ui::draw(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                out.push_str(cell.symbol());
            }
        }
        out.push('\n');
    }
    out
}

fn miner(kind: &str, alive: bool, hashrate: f64, efficiency: f64) -> MinerSnapshot {
    MinerSnapshot {
        kind: kind.to_string(),
        alive,
        hashrate_1m: hashrate,
        hashrate_avg: hashrate,
        efficiency,
        temp: 52.0,
        chip_temp: 55.0,
        power: 190.0,
        shares_accepted: 1200,
        shares_rejected: 3,
        uptime: 90_000,
        status: if alive {
            "Mining".to_string()
        } else {
            "Offline".to_string()
        },
        ..MinerSnapshot::default()
    }
}

#[test]
fn empty_dashboard_shows_waiting_panels() {
    let app = App::new(&config());
    let screen = render(&app, 120, 45);

    assert!(screen.contains("HASHWATCH"));
    assert!(screen.contains("BTC: ..."));
    assert!(screen.contains("MINERS (0/0)"));
    assert!(screen.contains("Waiting for miner data..."));
    assert!(screen.contains("HISTORY"));
    assert!(screen.contains("LIVE FEED (polling)"));
    assert!(screen.contains("Waiting for live feed..."));
    assert!(screen.contains("EVENTS"));
    assert!(screen.contains("FLEET"));
    assert!(screen.contains("[q]uit"));
}

#[test]
fn too_small_terminal_shows_the_requirement() {
    let app = App::new(&config());
    let screen = render(&app, 80, 20);

    assert!(screen.contains("Terminal too small"));
    assert!(screen.contains("Need at least 100x40, have 80x20"));
    assert!(!screen.contains("HASHWATCH"));
}

#[test]
fn fleet_renders_cards_placeholders_and_stale_note() {
    let mut app = App::new(&config());
    let mut fleet = BTreeMap::new();
    fleet.insert("BG02-1".to_string(), miner("BG02", true, 11.4, 15.0));
    fleet.insert("NERDQ-1".to_string(), miner("NERDQ", false, 0.0, 0.0));
    app.apply_snapshot(DashboardState {
        fleet: Some(fleet),
        fleet_error: Some("connection refused".to_string()),
        ..DashboardState::default()
    });
    let screen = render(&app, 120, 45);

    assert!(screen.contains("MINERS (1/2)"));
    assert!(screen.contains("BG02-1 (BG02)"));
    assert!(screen.contains("NERDQ-1 (NERDQ)"));
    assert!(screen.contains("11.400 TH/s"));
    assert!(screen.contains("\u{2b50}"));
    assert!(screen.contains("OPEN MINER SLOT"));
    assert!(screen.contains("Deploy next rig"));
    assert!(screen.contains("refresh failing, data may be stale"));
}

#[test]
fn price_quote_renders_with_change() {
    let mut app = App::new(&config());
    app.apply_snapshot(DashboardState {
        price: Some(PriceQuote {
            usd: 64123.5,
            change_24h: Some(2.5),
        }),
        ..DashboardState::default()
    });
    let screen = render(&app, 120, 45);

    assert!(screen.contains("$64,123.50"));
    assert!(screen.contains("+2.50% \u{2191} 24H"));
}

#[test]
fn price_without_change_omits_the_move() {
    let mut app = App::new(&config());
    app.apply_snapshot(DashboardState {
        price: Some(PriceQuote {
            usd: 59321.0,
            change_24h: None,
        }),
        ..DashboardState::default()
    });
    let screen = render(&app, 120, 45);

    assert!(screen.contains("$59,321.00"));
    assert!(!screen.contains("24H"));
}

#[test]
fn prompt_line_replaces_the_footer() {
    let mut app = App::new(&config());
    app.prompt.open(PromptMode::AddName);
    app.prompt.push('r');
    app.prompt.push('i');
    app.prompt.push('g');
    let screen = render(&app, 120, 45);

    assert!(screen.contains("Add miner name: rig_"));
    assert!(screen.contains("[Enter] submit"));
    assert!(!screen.contains("[q]uit"));
}

#[test]
fn history_panel_shows_sparkline_and_spotlight() {
    let mut app = App::new(&config());
    let rows = vec![
        HistoryRow {
            timestamp: "2026-08-25T09:59:00.000Z".to_string(),
            name: "BG02-1".to_string(),
            hashrate_1m: 10.8,
            temp: 51.0,
            alive: true,
            ..HistoryRow::default()
        },
        HistoryRow {
            timestamp: "2026-08-25T10:00:00.000Z".to_string(),
            name: "BG02-1".to_string(),
            hashrate_1m: 11.4,
            temp: 52.0,
            alive: true,
            ..HistoryRow::default()
        },
    ];
    let view = HistoryView {
        rows,
        summary: HistorySummary {
            latest_timestamp: Some("2026-08-25T10:00:00.000Z".to_string()),
            fleet_avg_hash: Some(11.1),
            fleet_hash_trend: Some("up".to_string()),
        },
        samples: 2,
        from_local_log: true,
    };
    app.apply_snapshot(DashboardState {
        history: Some(Arc::new(view)),
        ..DashboardState::default()
    });
    let screen = render(&app, 120, 45);

    assert!(screen.contains("HISTORY (local log)"));
    assert!(screen.contains("TH/s 11.40"));
    assert!(screen.contains("BG02-1: 11.40 TH/s"));
    assert!(screen.contains("Samples loaded: 2."));
}

#[test]
fn feed_panel_renders_live_sections() {
    let mut app = App::new(&config());
    app.apply_snapshot(DashboardState {
        feed_connected: true,
        live: LiveFeed {
            asic: Some(AsicStats {
                hashrate: 11.3,
                temperature: 51.5,
                fan_speed: 4650,
                power_usage: 185.0,
                accepted_shares: 4200,
                rejected_shares: 3,
                hw_errors: 1,
                pool_status: "connected".to_string(),
                ..AsicStats::default()
            }),
            luxor: Some(LuxorStats {
                hashrate_1h: 11.1,
                hashrate_24h: 10.9,
                workers_online: 2,
                efficiency: 98.7,
                revenue_24h: 0.00012345,
            }),
            chip_temps: vec![ChipTemp {
                chip_id: 0,
                temperature: 61.0,
                status: ChipStatus::Warning,
            }],
            ..LiveFeed::default()
        },
        ..DashboardState::default()
    });
    let screen = render(&app, 120, 45);

    assert!(screen.contains("LIVE FEED (live)"));
    assert!(screen.contains("ASIC"));
    assert!(screen.contains("fan 4650"));
    assert!(screen.contains("POOL"));
    assert!(screen.contains("2 workers"));
    assert!(screen.contains("CHIP"));
    assert!(screen.contains("0:61\u{b0}"));
}

#[test]
fn journal_shows_lines_and_health_counters() {
    let mut app = App::new(&config());
    app.apply_snapshot(DashboardState {
        journal: vec![JournalEntry {
            at: Local::now(),
            level: JournalLevel::Warn,
            line: "miner data unreachable: connection refused".to_string(),
        }],
        counters: StoreCounters {
            poll_failures: 2,
            stale_discards: 1,
            ..StoreCounters::default()
        },
        ..DashboardState::default()
    });
    let screen = render(&app, 120, 45);

    assert!(screen.contains("miner data unreachable"));
    assert!(screen.contains("fail 2"));
    assert!(screen.contains("stale 1"));
}
