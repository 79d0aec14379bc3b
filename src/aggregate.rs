// Fleet-wide derived values. Everything here is pure math over one
// FleetSnapshot; the app recomputes these once per snapshot and the
// widgets only format them.

use crate::models::{FleetSnapshot, MinerSnapshot};

/// Hashrate above which a BG02 counts as running hot enough to spin the orb.
const SPIN_THRESHOLD_BG02: f64 = 11.0;
/// NERDQ units and the named NerdAxe rigs share one threshold.
const SPIN_THRESHOLD_NERDQ: f64 = 15.0;

const HOURS_PER_DAY: f64 = 24.0;
/// Mean Gregorian month.
const DAYS_PER_MONTH: f64 = 30.4375;
const DAYS_PER_YEAR: f64 = 365.0;

/// Totals over the alive part of the fleet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FleetTotals {
    /// Alive miner count.
    pub miners: usize,
    /// Sum of 1-minute hashrates, TH/s.
    pub total_hashrate: f64,
    /// Mean efficiency in J/TH; 0 when nothing is alive.
    pub avg_efficiency: f64,
    /// Efficiency restated as a 0-100 score (lower J/TH scores higher).
    pub efficiency_percent: f64,
    pub total_accepted: u64,
    pub total_rejected: u64,
    pub total_stale: u64,
    /// Watts at the wall.
    pub total_power: f64,
}

impl FleetTotals {
    pub fn from_fleet(fleet: &FleetSnapshot) -> Self {
        let alive: Vec<&MinerSnapshot> = alive_miners(fleet).collect();
        let miners = alive.len();

        let avg_efficiency = if miners > 0 {
            alive.iter().map(|m| m.efficiency).sum::<f64>() / miners as f64
        } else {
            0.0
        };
        let efficiency_percent = if miners > 0 {
            (100.0 - avg_efficiency.min(100.0)).clamp(0.0, 100.0)
        } else {
            0.0
        };

        FleetTotals {
            miners,
            total_hashrate: alive.iter().map(|m| m.hashrate_1m).sum(),
            avg_efficiency,
            efficiency_percent,
            total_accepted: alive.iter().map(|m| m.shares_accepted).sum(),
            total_rejected: alive.iter().map(|m| m.shares_rejected).sum(),
            total_stale: alive.iter().map(|m| m.shares_stale).sum(),
            total_power: alive.iter().map(|m| m.power).sum(),
        }
    }
}

/// Miners singled out with a badge on the grid. All drawn from the alive set;
/// `None` when nothing qualifies (a fleet hashing at exactly zero earns no
/// star).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetHighlights {
    /// Highest 1-minute hashrate.
    pub top_hashrate: Option<String>,
    /// Lowest J/TH overall.
    pub best_efficiency: Option<String>,
    /// Lowest J/TH among BG02s, suppressed when it is also the overall best.
    pub best_efficiency_bg02: Option<String>,
}

impl FleetHighlights {
    pub fn from_fleet(fleet: &FleetSnapshot) -> Self {
        let mut top_hashrate: Option<(String, f64)> = None;
        let mut best_eff: Option<(String, f64)> = None;
        let mut best_eff_bg02: Option<(String, f64)> = None;

        for (name, m) in fleet.iter().filter(|(_, m)| m.alive) {
            if m.hashrate_1m > top_hashrate.as_ref().map_or(0.0, |(_, h)| *h) {
                top_hashrate = Some((name.clone(), m.hashrate_1m));
            }
            if best_eff.as_ref().is_none_or(|(_, e)| m.efficiency < *e) {
                best_eff = Some((name.clone(), m.efficiency));
            }
            if m.kind == "BG02" && best_eff_bg02.as_ref().is_none_or(|(_, e)| m.efficiency < *e) {
                best_eff_bg02 = Some((name.clone(), m.efficiency));
            }
        }

        let best_efficiency = best_eff.map(|(n, _)| n);
        let best_efficiency_bg02 = best_eff_bg02
            .map(|(n, _)| n)
            .filter(|n| Some(n) != best_efficiency.as_ref());

        FleetHighlights {
            top_hashrate: top_hashrate.map(|(n, _)| n),
            best_efficiency,
            best_efficiency_bg02,
        }
    }
}

pub fn alive_miners(fleet: &FleetSnapshot) -> impl Iterator<Item = &MinerSnapshot> {
    fleet.values().filter(|m| m.alive)
}

/// Spin threshold for one miner. Name overrides type; unknown hardware never
/// spins the orb.
pub fn spin_threshold(name: &str, kind: &str) -> Option<f64> {
    let name = name.trim().to_uppercase();
    let by_name = match name.as_str() {
        "NERDAXE1" | "NERDAXE" | "NERD" => Some(SPIN_THRESHOLD_NERDQ),
        _ => None,
    };
    if by_name.is_some() {
        return by_name;
    }
    match kind.trim().to_uppercase().as_str() {
        "BG02" => Some(SPIN_THRESHOLD_BG02),
        "NERDQ" => Some(SPIN_THRESHOLD_NERDQ),
        _ => None,
    }
}

/// True when any alive miner hashes above its spin threshold.
pub fn fleet_triggers_spin(fleet: &FleetSnapshot) -> bool {
    fleet
        .iter()
        .filter(|(_, m)| m.alive)
        .any(|(name, m)| match spin_threshold(name, &m.kind) {
            Some(t) => m.hashrate_1m > t,
            None => false,
        })
}

/// Projected energy use and cost at a flat $/kWh rate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PowerCost {
    pub kwh_hourly: f64,
    pub kwh_daily: f64,
    pub kwh_monthly: f64,
    pub kwh_annual: f64,
    pub cost_hourly: f64,
    pub cost_daily: f64,
    pub cost_monthly: f64,
    pub cost_annual: f64,
}

impl PowerCost {
    pub fn from_watts(watts: f64, rate_per_kwh: f64) -> Self {
        let kwh_hourly = watts / 1000.0;
        let kwh_daily = kwh_hourly * HOURS_PER_DAY;
        let kwh_monthly = kwh_daily * DAYS_PER_MONTH;
        let kwh_annual = kwh_daily * DAYS_PER_YEAR;
        PowerCost {
            kwh_hourly,
            kwh_daily,
            kwh_monthly,
            kwh_annual,
            cost_hourly: kwh_hourly * rate_per_kwh,
            cost_daily: kwh_daily * rate_per_kwh,
            cost_monthly: kwh_monthly * rate_per_kwh,
            cost_annual: kwh_annual * rate_per_kwh,
        }
    }
}

/// Placeholder cards shown under the live ones: at least one when the rack
/// has room, never more than three.
pub fn placeholder_slots(card_count: usize, total_slots: usize) -> usize {
    let open = total_slots.saturating_sub(card_count);
    if open > 0 { open.clamp(1, 3) } else { 0 }
}

/// Gauge fill for a hashrate against the configured full-scale value.
pub fn gauge_ratio(hashrate: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    (hashrate / max).clamp(0.0, 1.0)
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

/// Seconds to "3d 4h 5m".
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    format!("{days}d {hours}h {minutes}m")
}
