// Background poll scheduler. One task owns every refresh cadence: miner
// data, BTC price, history, the /api/stats fallback, and local sampling.
// Each fetch goes through the store's sequencing gate so a slow response
// can never clobber a newer one.

use crate::api::ApiClient;
use crate::sample_log::{self, SampleRow};
use crate::store::{PollSource, Store};
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Duration, interval};
use tracing::Instrument;

/// Channels, clients, and shutdown for the poller.
pub struct PollerDeps {
    pub api: Arc<ApiClient>,
    pub store: Arc<Store>,
    /// Row batches for the sample log writer; None disables local sampling.
    pub sample_tx: Option<mpsc::Sender<Vec<SampleRow>>>,
    pub rows_saved_total: Arc<AtomicU64>,
    /// Manual refresh requests (keyboard, post-control reload).
    pub refresh_rx: mpsc::Receiver<()>,
    pub shutdown_rx: oneshot::Receiver<()>,
}

/// Poll cadences. Sampling and stats logging use real-time intervals,
/// independent of the data cadences.
pub struct PollerConfig {
    pub miner_data_interval_ms: u64,
    pub btc_price_interval_ms: u64,
    pub history_interval_ms: u64,
    pub history_limit: u32,
    pub live_fallback_interval_ms: u64,
    pub sample_interval_ms: u64,
    pub stats_log_interval_secs: u64,
}

pub fn spawn(deps: PollerDeps, config: PollerConfig) -> tokio::task::JoinHandle<()> {
    let PollerDeps {
        api,
        store,
        sample_tx,
        rows_saved_total,
        mut refresh_rx,
        mut shutdown_rx,
    } = deps;
    let PollerConfig {
        miner_data_interval_ms,
        btc_price_interval_ms,
        history_interval_ms,
        history_limit,
        live_fallback_interval_ms,
        sample_interval_ms,
        stats_log_interval_secs,
    } = config;

    let span = tracing::span!(tracing::Level::DEBUG, "poller", miner_data_interval_ms);
    let task = async move {
        let mut miner_tick = interval(Duration::from_millis(miner_data_interval_ms));
        miner_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut price_tick = interval(Duration::from_millis(btc_price_interval_ms));
        price_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut history_tick = interval(Duration::from_millis(history_interval_ms));
        history_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut live_tick = interval(Duration::from_millis(live_fallback_interval_ms));
        live_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut sample_tick = interval(Duration::from_millis(sample_interval_ms));
        sample_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Closed refresh channel must not busy-loop the select.
        let mut refresh_open = true;

        loop {
            tokio::select! {
                _ = miner_tick.tick() => {
                    poll_miner_data(&api, &store).await;
                }
                _ = price_tick.tick() => {
                    poll_btc_price(&api, &store).await;
                }
                _ = history_tick.tick() => {
                    poll_history(&api, &store, history_limit).await;
                }
                _ = live_tick.tick() => {
                    // The socket carries this data when it is up.
                    if !store.feed_is_connected().await {
                        poll_live_stats(&api, &store).await;
                    }
                }
                _ = sample_tick.tick(), if sample_tx.is_some() => {
                    if let Some(tx) = &sample_tx {
                        enqueue_samples(&store, tx).await;
                    }
                }
                msg = refresh_rx.recv(), if refresh_open => {
                    match msg {
                        Some(()) => {
                            tracing::debug!(operation = "manual_refresh", "refreshing all sources");
                            poll_miner_data(&api, &store).await;
                            poll_btc_price(&api, &store).await;
                            poll_history(&api, &store, history_limit).await;
                        }
                        None => refresh_open = false,
                    }
                }
                _ = stats_tick.tick() => {
                    let counters = store.counters().await;
                    tracing::info!(
                        fleet_updates = counters.fleet_updates,
                        price_updates = counters.price_updates,
                        history_updates = counters.history_updates,
                        feed_messages = counters.feed_messages,
                        poll_failures = counters.poll_failures,
                        stale_discards = counters.stale_discards,
                        feed_reconnects = counters.feed_reconnects,
                        rows_saved_total = rows_saved_total.load(std::sync::atomic::Ordering::Relaxed),
                        "app stats"
                    );
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Poller shutting down");
                    break;
                }
            }
        }
    };
    tokio::spawn(task.instrument(span))
}

async fn poll_miner_data(api: &ApiClient, store: &Store) {
    let seq = store.begin_poll(PollSource::MinerData).await;
    match api.miner_data().await {
        Ok(fleet) => {
            store.apply_fleet(seq, fleet).await;
        }
        Err(e) => {
            tracing::warn!(error = %e, operation = "poll_miner_data", "miner data poll failed");
            store.fleet_failed(seq, e.to_string()).await;
        }
    }
}

async fn poll_btc_price(api: &ApiClient, store: &Store) {
    let seq = store.begin_poll(PollSource::BtcPrice).await;
    // Older backends only serve /btc-price; fall back on a 404.
    let result = match api.btc_price_24h().await {
        Err(e) if e.is_not_found() => api.btc_price().await,
        other => other,
    };
    match result {
        Ok(payload) => match payload.price {
            Some(price) if payload.success => {
                store.apply_price(seq, price, payload.change_24h).await;
            }
            _ => {
                let reason = payload
                    .error
                    .unwrap_or_else(|| "price missing from response".to_string());
                tracing::warn!(reason = %reason, operation = "poll_btc_price", "price poll rejected");
                store.price_failed(seq, reason).await;
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, operation = "poll_btc_price", "price poll failed");
            store.price_failed(seq, e.to_string()).await;
        }
    }
}

async fn poll_history(api: &ApiClient, store: &Store, limit: u32) {
    let seq = store.begin_poll(PollSource::History).await;
    match api.historical_metrics(limit).await {
        Ok(payload) if payload.success => {
            store.apply_history(seq, payload).await;
        }
        Ok(payload) => {
            let reason = payload
                .error
                .unwrap_or_else(|| "Unable to load historical metrics.".to_string());
            tracing::warn!(reason = %reason, operation = "poll_history", "history poll rejected");
            store.history_failed(seq, reason).await;
        }
        Err(e) => {
            tracing::warn!(error = %e, operation = "poll_history", "history poll failed");
            store.history_failed(seq, e.to_string()).await;
        }
    }
}

async fn poll_live_stats(api: &ApiClient, store: &Store) {
    let seq = store.begin_poll(PollSource::LiveStats).await;
    match api.live_stats().await {
        Ok(msg) => {
            store.apply_live_poll(seq, msg).await;
        }
        Err(e) => {
            tracing::debug!(error = %e, operation = "poll_live_stats", "live stats poll failed");
            store.live_poll_failed(seq).await;
        }
    }
}

/// Ships one batch of rows for the whole fleet to the writer. Skipped until
/// the first miner-data poll lands.
async fn enqueue_samples(store: &Store, tx: &mpsc::Sender<Vec<SampleRow>>) {
    let Some(fleet) = store.fleet().await else {
        return;
    };
    if fleet.is_empty() {
        return;
    }
    let now = chrono::Utc::now();
    let rows = sample_log::rows_from_fleet(
        now.timestamp_millis(),
        &now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        &fleet,
    );
    if tx.send(rows).await.is_err() {
        tracing::debug!("Sample writer channel closed");
    }
}
