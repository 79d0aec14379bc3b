use anyhow::Result;
use hashwatch::*;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::sync::{mpsc, oneshot};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

/// Seconds between time-based sample log flushes.
const SAMPLE_FLUSH_INTERVAL_SECS: u64 = 30;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let app_config = config::AppConfig::load()?;

    // The terminal belongs to the dashboard, so logs go to a file.
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&app_config.logging.file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
    tracing::info!(version = version::VERSION, "hashwatch starting");

    let api = Arc::new(api::ApiClient::new(&app_config.backend)?);
    let store = Arc::new(store::Store::new());
    let rows_saved_total = Arc::new(AtomicU64::new(0));

    // Local sample log: seed history from disk so charts draw before the
    // first backend answer, then keep writing in the background.
    let mut sample_tx = None;
    let mut writer_handle = None;
    if app_config.sample_log.enabled {
        let log = Arc::new(
            sample_log::SampleLog::connect(
                &app_config.sample_log.path,
                app_config.sample_log.retention_days,
            )
            .await?,
        );
        log.init().await?;
        match log.recent_rows(app_config.sample_log.seed_limit).await {
            Ok(rows) if !rows.is_empty() => {
                let seeded: Vec<_> = rows.iter().map(|r| r.to_history_row()).collect();
                store.seed_history(seeded).await;
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Could not seed history from sample log"),
        }

        let capacity = sample_log::writer_channel_capacity(app_config.sample_log.flush_rate);
        let (tx, rx) = mpsc::channel(capacity);
        sample_tx = Some(tx);
        writer_handle = Some(sample_log::spawn_writer(
            rx,
            log,
            sample_log::SampleWriterConfig {
                flush_rows: app_config.sample_log.flush_rate,
                flush_interval_secs: SAMPLE_FLUSH_INTERVAL_SECS,
                prune_interval_secs: sample_log::DEFAULT_PRUNE_INTERVAL_SECS,
            },
            rows_saved_total.clone(),
        ));
    }

    let (refresh_tx, refresh_rx) = mpsc::channel(4);
    let (poller_shutdown_tx, poller_shutdown_rx) = oneshot::channel();
    let poller_handle = poller::spawn(
        poller::PollerDeps {
            api: api.clone(),
            store: store.clone(),
            sample_tx: sample_tx.clone(),
            rows_saved_total: rows_saved_total.clone(),
            refresh_rx,
            shutdown_rx: poller_shutdown_rx,
        },
        poller::PollerConfig {
            miner_data_interval_ms: app_config.polling.miner_data_interval_ms,
            btc_price_interval_ms: app_config.polling.btc_price_interval_ms,
            history_interval_ms: app_config.polling.history_interval_ms,
            history_limit: app_config.polling.history_limit,
            live_fallback_interval_ms: app_config.feed.fallback_poll_interval_ms,
            sample_interval_ms: app_config.sample_log.sample_interval_ms,
            stats_log_interval_secs: app_config.polling.stats_log_interval_secs,
        },
    );

    let mut feed_handle = None;
    let mut feed_shutdown_tx = None;
    if app_config.feed.enabled {
        let (tx, rx) = oneshot::channel();
        feed_shutdown_tx = Some(tx);
        feed_handle = Some(feed::spawn(
            feed::FeedDeps {
                store: store.clone(),
                shutdown_rx: rx,
            },
            feed::FeedConfig {
                url: app_config.backend.ws_url.clone(),
                reconnect_delay_ms: app_config.feed.reconnect_delay_ms,
            },
        ));
    }

    let result = tui::run(
        tui::TuiDeps {
            api,
            store,
            refresh_tx,
        },
        tui::TuiConfig {
            grid_slots: app_config.display.grid_slots,
            gauge_max_hashrate: app_config.display.gauge_max_hashrate,
            power_cost_per_kwh: app_config.display.power_cost_per_kwh,
            assist_provider: app_config.assist.provider.clone(),
            feed_enabled: app_config.feed.enabled,
        },
    )
    .await;

    tracing::info!("Shutting down background tasks");
    let _ = poller_shutdown_tx.send(());
    if let Some(tx) = feed_shutdown_tx {
        let _ = tx.send(());
    }
    // Closing the sample channel triggers the writer's final flush.
    drop(sample_tx);
    let _ = poller_handle.await;
    if let Some(handle) = feed_handle {
        let _ = handle.await;
    }
    if let Some(handle) = writer_handle {
        let _ = handle.await;
    }

    result
}
