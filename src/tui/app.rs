//! Display state for the dashboard. `App` is fed store snapshots and holds
//! everything the widgets render, with the derived fleet values computed once
//! per data change instead of once per frame.

use crate::aggregate::{FleetHighlights, FleetTotals, PowerCost, fleet_triggers_spin};
use crate::charts::{self, ChartPoint, SpotlightEntry};
use crate::store::DashboardState;

use super::TuiConfig;

/// Minimum terminal width for the dashboard to render.
pub const MIN_COLS: u16 = 100;

/// Minimum terminal height for the dashboard to render.
pub const MIN_ROWS: u16 = 40;

/// Spotlight entries shown under the history chart.
pub const SPOTLIGHT_TOP: usize = 5;

pub struct App {
    pub should_quit: bool,
    /// Latest store snapshot; widgets read raw data from here.
    pub state: DashboardState,
    pub totals: FleetTotals,
    pub highlights: FleetHighlights,
    pub spin_active: bool,
    pub power_cost: PowerCost,
    pub series: Vec<ChartPoint>,
    pub spotlight: Vec<SpotlightEntry>,
    pub chart_meta: String,
    pub prompt: Prompt,
    pub feed_enabled: bool,
    pub grid_slots: usize,
    pub gauge_max_hashrate: f64,
    power_cost_per_kwh: f64,
}

impl App {
    pub fn new(config: &TuiConfig) -> Self {
        App {
            should_quit: false,
            state: DashboardState::default(),
            totals: FleetTotals::default(),
            highlights: FleetHighlights::default(),
            spin_active: false,
            power_cost: PowerCost::default(),
            series: Vec::new(),
            spotlight: Vec::new(),
            chart_meta: String::new(),
            prompt: Prompt::default(),
            feed_enabled: config.feed_enabled,
            grid_slots: config.grid_slots,
            gauge_max_hashrate: config.gauge_max_hashrate,
            power_cost_per_kwh: config.power_cost_per_kwh,
        }
    }

    /// Replaces the displayed snapshot and recomputes everything derived
    /// from it.
    pub fn apply_snapshot(&mut self, state: DashboardState) {
        match &state.fleet {
            Some(fleet) => {
                self.totals = FleetTotals::from_fleet(fleet);
                self.highlights = FleetHighlights::from_fleet(fleet);
                self.spin_active = fleet_triggers_spin(fleet);
            }
            None => {
                self.totals = FleetTotals::default();
                self.highlights = FleetHighlights::default();
                self.spin_active = false;
            }
        }
        self.power_cost = PowerCost::from_watts(self.totals.total_power, self.power_cost_per_kwh);

        match &state.history {
            Some(history) => {
                self.series = charts::build_series(&history.rows);
                self.spotlight = charts::spotlight(&history.rows, &history.summary, SPOTLIGHT_TOP);
                self.chart_meta = charts::meta_line(history.samples, &history.summary);
            }
            None => {
                self.series.clear();
                self.spotlight.clear();
                self.chart_meta.clear();
            }
        }

        self.state = state;
    }
}

/// Which input the prompt line is collecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptMode {
    AddName,
    /// Second stage of add: the name is already collected.
    AddIp { name: String },
    DeleteName,
    AiQuestion,
}

/// One-line input field at the bottom of the screen.
#[derive(Debug, Default)]
pub struct Prompt {
    pub mode: Option<PromptMode>,
    pub buffer: String,
}

impl Prompt {
    pub fn open(&mut self, mode: PromptMode) {
        self.mode = Some(mode);
        self.buffer.clear();
    }

    pub fn cancel(&mut self) {
        self.mode = None;
        self.buffer.clear();
    }

    pub fn is_open(&self) -> bool {
        self.mode.is_some()
    }

    pub fn push(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    pub fn label(&self) -> String {
        match &self.mode {
            Some(PromptMode::AddName) => "Add miner name".to_string(),
            Some(PromptMode::AddIp { name }) => format!("IP for {name}"),
            Some(PromptMode::DeleteName) => "Delete miner name".to_string(),
            Some(PromptMode::AiQuestion) => "AI question".to_string(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MinerSnapshot;
    use crate::store::DashboardState;
    use std::collections::BTreeMap;

    fn test_config() -> TuiConfig {
        TuiConfig {
            grid_slots: 9,
            gauge_max_hashrate: 10.0,
            power_cost_per_kwh: 0.13,
            assist_provider: "smart".to_string(),
            feed_enabled: true,
        }
    }

    #[test]
    fn new_app_starts_empty() {
        let app = App::new(&test_config());
        assert!(!app.should_quit);
        assert!(!app.prompt.is_open());
        assert_eq!(app.totals.miners, 0);
        assert!(app.series.is_empty());
    }

    #[test]
    fn apply_snapshot_recomputes_totals() {
        let mut app = App::new(&test_config());
        let mut fleet = BTreeMap::new();
        fleet.insert(
            "A".to_string(),
            MinerSnapshot {
                alive: true,
                hashrate_1m: 5.0,
                efficiency: 20.0,
                shares_accepted: 10,
                shares_rejected: 1,
                power: 100.0,
                ..MinerSnapshot::default()
            },
        );
        let state = DashboardState {
            fleet: Some(fleet),
            ..DashboardState::default()
        };

        app.apply_snapshot(state);

        assert_eq!(app.totals.miners, 1);
        assert_eq!(app.totals.total_hashrate, 5.0);
        assert_eq!(app.totals.total_accepted, 10);
        assert_eq!(app.totals.total_rejected, 1);
        assert_eq!(app.totals.efficiency_percent, 80.0);
        assert!(app.power_cost.cost_monthly > 0.0);
    }

    #[test]
    fn apply_snapshot_without_fleet_resets_derived() {
        let mut app = App::new(&test_config());
        let mut fleet = BTreeMap::new();
        fleet.insert(
            "A".to_string(),
            MinerSnapshot {
                alive: true,
                hashrate_1m: 5.0,
                ..MinerSnapshot::default()
            },
        );
        app.apply_snapshot(DashboardState {
            fleet: Some(fleet),
            ..DashboardState::default()
        });
        assert_eq!(app.totals.miners, 1);

        app.apply_snapshot(DashboardState::default());
        assert_eq!(app.totals.miners, 0);
        assert!(!app.spin_active);
    }

    #[test]
    fn prompt_open_clears_buffer() {
        let mut prompt = Prompt::default();
        prompt.push('x');
        prompt.open(PromptMode::AddName);
        assert!(prompt.buffer.is_empty());
        assert!(prompt.is_open());
    }

    #[test]
    fn prompt_cancel_closes() {
        let mut prompt = Prompt::default();
        prompt.open(PromptMode::DeleteName);
        prompt.push('g');
        prompt.cancel();
        assert!(!prompt.is_open());
        assert!(prompt.buffer.is_empty());
    }

    #[test]
    fn prompt_label_names_the_add_stage() {
        let mut prompt = Prompt::default();
        prompt.open(PromptMode::AddIp {
            name: "gamma".to_string(),
        });
        assert_eq!(prompt.label(), "IP for gamma");
    }

    #[test]
    fn prompt_backspace_pops() {
        let mut prompt = Prompt::default();
        prompt.open(PromptMode::AiQuestion);
        prompt.push('h');
        prompt.push('i');
        prompt.backspace();
        assert_eq!(prompt.buffer, "h");
    }
}
