// Shared dashboard store. Single owner of everything the screen renders:
// pollers and the feed task write through sequenced apply methods, the UI
// reads cloned snapshots and listens on the event bus for redraw hints.
//
// Every poll gets a monotonically increasing id per source; a completion is
// applied only while its id is still the latest issued, so a hung request
// can never overwrite fresher data when it finally lands.

use crate::models::{
    AsicStats, ChipTemp, FeedMessage, FleetSnapshot, HistoryResponse, HistoryRow, HistorySummary,
    LuxorStats, NetworkStats,
};
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

const EVENT_CHANNEL_CAPACITY: usize = 64;
/// Journal lines kept for the event log panel.
const JOURNAL_CAPACITY: usize = 100;

/// Which request family a poll id belongs to. Ids are sequenced per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollSource {
    MinerData,
    BtcPrice,
    History,
    /// /api/stats, polled only while the live feed socket is down.
    LiveStats,
}

pub const POLL_SOURCE_COUNT: usize = 4;

impl PollSource {
    pub fn as_str(self) -> &'static str {
        match self {
            PollSource::MinerData => "miner-data",
            PollSource::BtcPrice => "btc-price",
            PollSource::History => "historical-metrics",
            PollSource::LiveStats => "live-stats",
        }
    }

    fn index(self) -> usize {
        match self {
            PollSource::MinerData => 0,
            PollSource::BtcPrice => 1,
            PollSource::History => 2,
            PollSource::LiveStats => 3,
        }
    }
}

/// Redraw hints published on the event bus. Deliberately small; subscribers
/// pull the data they need from a fresh snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    FleetUpdated,
    PriceUpdated,
    HistoryUpdated,
    FeedUpdated,
    FeedConnection { connected: bool },
    PollFailed { source: PollSource },
    StaleDiscarded { source: PollSource, seq: u64 },
    /// Journal-only addition (control outcomes, seeds, notes).
    Note,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub usd: f64,
    pub change_24h: Option<f64>,
}

/// History window currently backing the charts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryView {
    pub rows: Vec<HistoryRow>,
    pub summary: HistorySummary,
    pub samples: u64,
    /// True while showing rows seeded from the local sample log instead of
    /// the backend.
    pub from_local_log: bool,
}

/// Latest live feed sections. A push replaces only the sections it carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveFeed {
    pub asic: Option<AsicStats>,
    pub network: Option<NetworkStats>,
    pub luxor: Option<LuxorStats>,
    pub chip_temps: Vec<ChipTemp>,
    pub last_update: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub at: DateTime<Local>,
    pub level: JournalLevel,
    pub line: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounters {
    pub fleet_updates: u64,
    pub price_updates: u64,
    pub history_updates: u64,
    pub feed_messages: u64,
    pub poll_failures: u64,
    pub stale_discards: u64,
    pub feed_reconnects: u64,
}

/// Everything one frame needs, cloned out under a read lock.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub fleet: Option<FleetSnapshot>,
    /// Set while the last miner-data poll failed; stale grid stays visible.
    pub fleet_error: Option<String>,
    /// None renders the dashed placeholder, matching a failed price fetch.
    pub price: Option<PriceQuote>,
    pub price_error: Option<String>,
    pub history: Option<Arc<HistoryView>>,
    pub history_error: Option<String>,
    pub live: LiveFeed,
    pub feed_connected: bool,
    pub journal: Vec<JournalEntry>,
    pub counters: StoreCounters,
}

struct Inner {
    fleet: Option<FleetSnapshot>,
    fleet_error: Option<String>,
    price: Option<PriceQuote>,
    price_error: Option<String>,
    history: Option<Arc<HistoryView>>,
    history_error: Option<String>,
    live: LiveFeed,
    feed_connected: bool,
    journal: VecDeque<JournalEntry>,
    counters: StoreCounters,
    issued: [u64; POLL_SOURCE_COUNT],
}

impl Inner {
    fn push_journal(&mut self, level: JournalLevel, line: String) {
        if self.journal.len() == JOURNAL_CAPACITY {
            self.journal.pop_front();
        }
        self.journal.push_back(JournalEntry {
            at: Local::now(),
            level,
            line,
        });
    }

    /// True while `seq` is still the latest issued id for `source`;
    /// otherwise counts and journals the discard.
    fn gate(&mut self, source: PollSource, seq: u64) -> bool {
        let latest = self.issued[source.index()];
        if seq == latest {
            return true;
        }
        self.counters.stale_discards += 1;
        self.push_journal(
            JournalLevel::Warn,
            format!(
                "{}: discarded stale response #{} (latest is #{})",
                source.as_str(),
                seq,
                latest
            ),
        );
        false
    }

    fn merge_feed(&mut self, msg: FeedMessage) {
        if let Some(asic) = msg.asic_stats {
            self.live.asic = Some(asic);
        }
        if let Some(network) = msg.network_stats {
            self.live.network = Some(network);
        }
        if let Some(luxor) = msg.luxor_stats {
            self.live.luxor = Some(luxor);
        }
        if !msg.chip_temps.is_empty() {
            self.live.chip_temps = msg.chip_temps;
        }
        self.live.last_update = Some(Local::now());
        self.counters.feed_messages += 1;
    }
}

pub struct Store {
    inner: RwLock<Inner>,
    events: broadcast::Sender<StoreEvent>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Store {
            inner: RwLock::new(Inner {
                fleet: None,
                fleet_error: None,
                price: None,
                price_error: None,
                history: None,
                history_error: None,
                live: LiveFeed::default(),
                feed_connected: false,
                journal: VecDeque::new(),
                counters: StoreCounters::default(),
                issued: [0; POLL_SOURCE_COUNT],
            }),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: StoreEvent) {
        // Nobody listening is fine (tests, headless runs).
        let _ = self.events.send(event);
    }

    pub async fn snapshot(&self) -> DashboardState {
        let inner = self.inner.read().await;
        DashboardState {
            fleet: inner.fleet.clone(),
            fleet_error: inner.fleet_error.clone(),
            price: inner.price,
            price_error: inner.price_error.clone(),
            history: inner.history.clone(),
            history_error: inner.history_error.clone(),
            live: inner.live.clone(),
            feed_connected: inner.feed_connected,
            journal: inner.journal.iter().cloned().collect(),
            counters: inner.counters,
        }
    }

    pub async fn counters(&self) -> StoreCounters {
        self.inner.read().await.counters
    }

    pub async fn feed_is_connected(&self) -> bool {
        self.inner.read().await.feed_connected
    }

    /// Just the fleet, for the sampling path; cheaper than a full snapshot.
    pub async fn fleet(&self) -> Option<FleetSnapshot> {
        self.inner.read().await.fleet.clone()
    }

    /// Issues the next request id for a source. The returned id must be
    /// passed back with the completion.
    pub async fn begin_poll(&self, source: PollSource) -> u64 {
        let mut inner = self.inner.write().await;
        inner.issued[source.index()] += 1;
        inner.issued[source.index()]
    }

    /// Applies a miner-data payload; returns false for a stale id.
    pub async fn apply_fleet(&self, seq: u64, fleet: FleetSnapshot) -> bool {
        let event = {
            let mut inner = self.inner.write().await;
            if !inner.gate(PollSource::MinerData, seq) {
                StoreEvent::StaleDiscarded {
                    source: PollSource::MinerData,
                    seq,
                }
            } else {
                if inner.fleet_error.take().is_some() {
                    inner.push_journal(
                        JournalLevel::Info,
                        format!("miner data restored ({} miners)", fleet.len()),
                    );
                }
                inner.fleet = Some(fleet);
                inner.counters.fleet_updates += 1;
                StoreEvent::FleetUpdated
            }
        };
        let applied = event == StoreEvent::FleetUpdated;
        self.publish(event);
        applied
    }

    /// Records a miner-data failure; the previous fleet stays on screen.
    pub async fn fleet_failed(&self, seq: u64, error: String) -> bool {
        let event = {
            let mut inner = self.inner.write().await;
            if !inner.gate(PollSource::MinerData, seq) {
                StoreEvent::StaleDiscarded {
                    source: PollSource::MinerData,
                    seq,
                }
            } else {
                inner.counters.poll_failures += 1;
                if inner.fleet_error.is_none() {
                    inner.push_journal(
                        JournalLevel::Warn,
                        format!("miner data unreachable: {error}"),
                    );
                }
                inner.fleet_error = Some(error);
                StoreEvent::PollFailed {
                    source: PollSource::MinerData,
                }
            }
        };
        let applied = matches!(event, StoreEvent::PollFailed { .. });
        self.publish(event);
        applied
    }

    /// Applies a price payload. An unsuccessful body counts as a failure and
    /// resets the display to its placeholder.
    pub async fn apply_price(&self, seq: u64, price: f64, change_24h: Option<f64>) -> bool {
        let event = {
            let mut inner = self.inner.write().await;
            if !inner.gate(PollSource::BtcPrice, seq) {
                StoreEvent::StaleDiscarded {
                    source: PollSource::BtcPrice,
                    seq,
                }
            } else {
                if inner.price_error.take().is_some() {
                    inner.push_journal(JournalLevel::Info, "BTC price restored".to_string());
                }
                inner.price = Some(PriceQuote {
                    usd: price,
                    change_24h,
                });
                inner.counters.price_updates += 1;
                StoreEvent::PriceUpdated
            }
        };
        let applied = event == StoreEvent::PriceUpdated;
        self.publish(event);
        applied
    }

    /// Records a price failure; unlike the grid, the quote resets to the
    /// placeholder rather than going stale.
    pub async fn price_failed(&self, seq: u64, error: String) -> bool {
        let event = {
            let mut inner = self.inner.write().await;
            if !inner.gate(PollSource::BtcPrice, seq) {
                StoreEvent::StaleDiscarded {
                    source: PollSource::BtcPrice,
                    seq,
                }
            } else {
                inner.counters.poll_failures += 1;
                if inner.price_error.is_none() {
                    inner.push_journal(JournalLevel::Warn, format!("BTC price unavailable: {error}"));
                }
                inner.price = None;
                inner.price_error = Some(error);
                StoreEvent::PollFailed {
                    source: PollSource::BtcPrice,
                }
            }
        };
        let applied = matches!(event, StoreEvent::PollFailed { .. });
        self.publish(event);
        applied
    }

    /// Applies a history payload, replacing any locally seeded window.
    pub async fn apply_history(&self, seq: u64, payload: HistoryResponse) -> bool {
        let event = {
            let mut inner = self.inner.write().await;
            if !inner.gate(PollSource::History, seq) {
                StoreEvent::StaleDiscarded {
                    source: PollSource::History,
                    seq,
                }
            } else {
                if inner.history_error.take().is_some() {
                    inner.push_journal(JournalLevel::Info, "historical metrics restored".to_string());
                }
                inner.history = Some(Arc::new(HistoryView {
                    rows: payload.data,
                    summary: payload.summary,
                    samples: payload.samples,
                    from_local_log: false,
                }));
                inner.counters.history_updates += 1;
                StoreEvent::HistoryUpdated
            }
        };
        let applied = event == StoreEvent::HistoryUpdated;
        self.publish(event);
        applied
    }

    pub async fn history_failed(&self, seq: u64, error: String) -> bool {
        let event = {
            let mut inner = self.inner.write().await;
            if !inner.gate(PollSource::History, seq) {
                StoreEvent::StaleDiscarded {
                    source: PollSource::History,
                    seq,
                }
            } else {
                inner.counters.poll_failures += 1;
                if inner.history_error.is_none() {
                    inner.push_journal(
                        JournalLevel::Warn,
                        format!("historical metrics failed: {error}"),
                    );
                }
                inner.history_error = Some(error);
                StoreEvent::PollFailed {
                    source: PollSource::History,
                }
            }
        };
        let applied = matches!(event, StoreEvent::PollFailed { .. });
        self.publish(event);
        applied
    }

    /// Seeds the charts from the local sample log. No-op once any history
    /// window is present.
    pub async fn seed_history(&self, rows: Vec<HistoryRow>) -> bool {
        let seeded = {
            let mut inner = self.inner.write().await;
            if inner.history.is_some() || rows.is_empty() {
                false
            } else {
                let latest_timestamp = rows.last().map(|r| r.timestamp.clone());
                let samples = rows.len() as u64;
                inner.history = Some(Arc::new(HistoryView {
                    rows,
                    summary: HistorySummary {
                        latest_timestamp,
                        ..HistorySummary::default()
                    },
                    samples,
                    from_local_log: true,
                }));
                inner.push_journal(
                    JournalLevel::Info,
                    format!("charts seeded from local sample log ({samples} rows)"),
                );
                true
            }
        };
        if seeded {
            self.publish(StoreEvent::HistoryUpdated);
        }
        seeded
    }

    /// Merges a live feed push (socket path, no sequencing).
    pub async fn apply_feed_message(&self, msg: FeedMessage) {
        {
            let mut inner = self.inner.write().await;
            inner.merge_feed(msg);
        }
        self.publish(StoreEvent::FeedUpdated);
    }

    /// Merges a polled /api/stats payload; sequenced like the other polls.
    pub async fn apply_live_poll(&self, seq: u64, msg: FeedMessage) -> bool {
        let event = {
            let mut inner = self.inner.write().await;
            if !inner.gate(PollSource::LiveStats, seq) {
                StoreEvent::StaleDiscarded {
                    source: PollSource::LiveStats,
                    seq,
                }
            } else {
                inner.merge_feed(msg);
                StoreEvent::FeedUpdated
            }
        };
        let applied = event == StoreEvent::FeedUpdated;
        self.publish(event);
        applied
    }

    /// Counts a fallback poll failure. No journal line: while the backend is
    /// fully down this fires every cycle and the feed panel already shows
    /// the disconnect.
    pub async fn live_poll_failed(&self, seq: u64) -> bool {
        let event = {
            let mut inner = self.inner.write().await;
            if !inner.gate(PollSource::LiveStats, seq) {
                StoreEvent::StaleDiscarded {
                    source: PollSource::LiveStats,
                    seq,
                }
            } else {
                inner.counters.poll_failures += 1;
                StoreEvent::PollFailed {
                    source: PollSource::LiveStats,
                }
            }
        };
        let applied = matches!(event, StoreEvent::PollFailed { .. });
        self.publish(event);
        applied
    }

    pub async fn feed_connected(&self) {
        {
            let mut inner = self.inner.write().await;
            if !inner.feed_connected {
                inner.push_journal(JournalLevel::Info, "live feed connected".to_string());
            }
            inner.feed_connected = true;
        }
        self.publish(StoreEvent::FeedConnection { connected: true });
    }

    pub async fn feed_disconnected(&self, reason: &str) {
        let was_connected = {
            let mut inner = self.inner.write().await;
            let was = inner.feed_connected;
            if was {
                inner.push_journal(JournalLevel::Warn, format!("live feed disconnected: {reason}"));
            }
            inner.feed_connected = false;
            was
        };
        if was_connected {
            self.publish(StoreEvent::FeedConnection { connected: false });
        }
    }

    /// Counts one reconnect attempt being scheduled.
    pub async fn note_feed_reconnect(&self) {
        let mut inner = self.inner.write().await;
        inner.counters.feed_reconnects += 1;
    }

    /// Drops a line into the journal (control outcomes, startup notes).
    pub async fn note(&self, level: JournalLevel, line: String) {
        {
            let mut inner = self.inner.write().await;
            inner.push_journal(level, line);
        }
        self.publish(StoreEvent::Note);
    }
}
