// Local SQLite sample log. Keeps a short window of per-miner samples so the
// charts have something to show before the backend answers (and across
// backend restarts). Collection happens in the poller; writes run in a
// dedicated writer task fed over a channel.

use crate::models::{FleetSnapshot, HistoryRow};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::sync::mpsc;
use tokio::time::{Duration, interval};
use tracing::instrument;

/// Hourly pruning keeps the file small without a config knob.
pub const DEFAULT_PRUNE_INTERVAL_SECS: u64 = 3600;

/// One logged sample: a single miner at a single logging instant. A whole
/// fleet logged together shares one `timestamp` string.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    /// Epoch millis, used for retention math.
    pub created_at: i64,
    /// RFC 3339 logging instant, shared across the batch.
    pub timestamp: String,
    pub name: String,
    pub hashrate_1m: f64,
    pub hashrate_avg: f64,
    pub power: f64,
    pub efficiency: f64,
    pub temp: f64,
    pub chip_temp: f64,
    pub shares_accepted: u64,
    pub shares_rejected: u64,
    pub alive: bool,
}

impl SampleRow {
    pub fn to_history_row(&self) -> HistoryRow {
        HistoryRow {
            timestamp: self.timestamp.clone(),
            name: self.name.clone(),
            hashrate_1m: self.hashrate_1m,
            hashrate_avg: self.hashrate_avg,
            power: self.power,
            efficiency: self.efficiency,
            temp: self.temp,
            chip_temp: self.chip_temp,
            shares_accepted: self.shares_accepted,
            shares_rejected: self.shares_rejected,
            alive: self.alive,
        }
    }
}

/// One batch of rows for the whole fleet, every miner whether alive or not.
pub fn rows_from_fleet(created_at_ms: i64, timestamp: &str, fleet: &FleetSnapshot) -> Vec<SampleRow> {
    fleet
        .iter()
        .map(|(name, m)| SampleRow {
            created_at: created_at_ms,
            timestamp: timestamp.to_string(),
            name: name.clone(),
            hashrate_1m: round5(m.hashrate_1m),
            hashrate_avg: round5(m.hashrate_avg),
            power: m.power,
            efficiency: round5(m.efficiency),
            temp: m.temp,
            chip_temp: m.chip_temp,
            shares_accepted: m.shares_accepted,
            shares_rejected: m.shares_rejected,
            alive: m.alive,
        })
        .collect()
}

fn round5(v: f64) -> f64 {
    (v * 100_000.0).round() / 100_000.0
}

pub struct SampleLog {
    pool: SqlitePool,
    retention_ms: i64,
}

impl SampleLog {
    pub async fn connect(path: &str, retention_days: u32) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new().connect_with(opts).await?;
        let retention_ms = (retention_days as i64) * 24 * 60 * 60 * 1000;
        Ok(Self { pool, retention_ms })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS miner_samples (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at INTEGER NOT NULL,
                timestamp TEXT NOT NULL,
                name TEXT NOT NULL,
                hashrate_1m REAL NOT NULL,
                hashrate_avg REAL NOT NULL,
                power REAL NOT NULL,
                efficiency REAL NOT NULL,
                temp REAL NOT NULL,
                chip_temp REAL NOT NULL,
                shares_accepted INTEGER NOT NULL,
                shares_rejected INTEGER NOT NULL,
                alive INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_samples_created_at ON miner_samples(created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self, rows), fields(repo = "sample_log", operation = "save_rows", rows_count = rows.len()))]
    pub async fn save_rows(&self, rows: &[SampleRow]) -> anyhow::Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        for r in rows {
            sqlx::query(
                "INSERT INTO miner_samples (created_at, timestamp, name, hashrate_1m, hashrate_avg, power, efficiency, temp, chip_temp, shares_accepted, shares_rejected, alive)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
            )
            .bind(r.created_at)
            .bind(&r.timestamp)
            .bind(&r.name)
            .bind(r.hashrate_1m)
            .bind(r.hashrate_avg)
            .bind(r.power)
            .bind(r.efficiency)
            .bind(r.temp)
            .bind(r.chip_temp)
            .bind(r.shares_accepted as i64)
            .bind(r.shares_rejected as i64)
            .bind(r.alive as i64)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Newest `limit` rows in chronological order.
    pub async fn recent_rows(&self, limit: u32) -> anyhow::Result<Vec<SampleRow>> {
        let rows = sqlx::query(
            "SELECT created_at, timestamp, name, hashrate_1m, hashrate_avg, power, efficiency, temp, chip_temp, shares_accepted, shares_rejected, alive
             FROM miner_samples ORDER BY id DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(SampleRow {
                created_at: row.try_get("created_at")?,
                timestamp: row.try_get("timestamp")?,
                name: row.try_get("name")?,
                hashrate_1m: row.try_get("hashrate_1m")?,
                hashrate_avg: row.try_get("hashrate_avg")?,
                power: row.try_get("power")?,
                efficiency: row.try_get("efficiency")?,
                temp: row.try_get("temp")?,
                chip_temp: row.try_get("chip_temp")?,
                shares_accepted: row.try_get::<i64, _>("shares_accepted")? as u64,
                shares_rejected: row.try_get::<i64, _>("shares_rejected")? as u64,
                alive: row.try_get::<i64, _>("alive")? != 0,
            });
        }
        out.reverse();
        Ok(out)
    }

    #[instrument(skip(self), fields(repo = "sample_log", operation = "prune_old_rows"))]
    pub async fn prune_old_rows(&self) -> anyhow::Result<u64> {
        let cutoff = (std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_millis() as i64)
            - self.retention_ms;
        let result = sqlx::query("DELETE FROM miner_samples WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Writer batching config.
pub struct SampleWriterConfig {
    pub flush_rows: u64,
    pub flush_interval_secs: u64,
    pub prune_interval_secs: u64,
}

/// Channel capacity for the sample writer (backpressure if the writer falls behind).
pub fn writer_channel_capacity(flush_rows: u64) -> usize {
    (flush_rows as usize * 2).max(32)
}

/// Spawns the task that receives row batches from the poller and flushes to
/// the DB. Flushes when the buffer reaches flush_rows, every
/// flush_interval_secs, and once more when the channel closes.
pub fn spawn_writer(
    mut write_rx: mpsc::Receiver<Vec<SampleRow>>,
    log: Arc<SampleLog>,
    config: SampleWriterConfig,
    rows_saved_total: Arc<AtomicU64>,
) -> tokio::task::JoinHandle<()> {
    let flush_interval = Duration::from_secs(config.flush_interval_secs);
    let prune_interval = Duration::from_secs(config.prune_interval_secs);
    tokio::spawn(async move {
        let mut buffer: Vec<SampleRow> = Vec::new();
        let mut flush_tick = interval(flush_interval);
        flush_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut prune_tick = interval(prune_interval);
        prune_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                result = write_rx.recv() => {
                    match result {
                        Some(mut rows) => {
                            buffer.append(&mut rows);
                            if buffer.len() >= config.flush_rows as usize
                                && let Err(e) = flush_buffer(&log, &mut buffer, &rows_saved_total).await
                            {
                                tracing::warn!(error = %e, "sample writer: save_rows failed");
                            }
                        }
                        None => break,
                    }
                }
                _ = flush_tick.tick() => {
                    if let Err(e) = flush_buffer(&log, &mut buffer, &rows_saved_total).await {
                        tracing::warn!(error = %e, "sample writer: save_rows failed");
                    }
                }
                _ = prune_tick.tick() => {
                    match log.prune_old_rows().await {
                        Ok(pruned) if pruned > 0 => {
                            tracing::debug!(operation = "prune_old_rows", rows_pruned = pruned, "Old samples pruned");
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!(error = %e, operation = "prune_old_rows", "Failed to prune old samples");
                        }
                    }
                }
            }
        }
        if let Err(e) = flush_buffer(&log, &mut buffer, &rows_saved_total).await {
            tracing::warn!(error = %e, "sample writer: final flush failed");
        }
        tracing::debug!("Sample writer shutting down");
    })
}

async fn flush_buffer(
    log: &SampleLog,
    buffer: &mut Vec<SampleRow>,
    rows_saved_total: &AtomicU64,
) -> anyhow::Result<()> {
    if buffer.is_empty() {
        return Ok(());
    }
    let n = buffer.len();
    log.save_rows(buffer).await?;
    rows_saved_total.fetch_add(n as u64, std::sync::atomic::Ordering::Relaxed);
    buffer.clear();
    tracing::debug!(operation = "save_rows", rows_count = n, "Samples saved");
    Ok(())
}
