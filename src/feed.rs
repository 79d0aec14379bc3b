//! Live feed task: holds the websocket open and folds pushed updates into the store.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{Instrument, debug, warn};

use crate::models::FeedMessage;
use crate::store::Store;

pub struct FeedDeps {
    pub store: Arc<Store>,
    pub shutdown_rx: oneshot::Receiver<()>,
}

pub struct FeedConfig {
    pub url: String,
    pub reconnect_delay_ms: u64,
}

/// Connects to the live feed and keeps reading until shutdown.
///
/// Each closed or failed connection schedules exactly one reconnect after the
/// configured delay. While the task is between connections the store reports
/// the feed as disconnected and the poller covers the gap over HTTP.
pub fn spawn(deps: FeedDeps, config: FeedConfig) -> JoinHandle<()> {
    let FeedDeps {
        store,
        mut shutdown_rx,
    } = deps;
    let FeedConfig {
        url,
        reconnect_delay_ms,
    } = config;
    let reconnect_delay = Duration::from_millis(reconnect_delay_ms);

    let span = tracing::span!(tracing::Level::DEBUG, "live_feed");
    let task = async move {
        loop {
            let connect = tokio::select! {
                result = connect_async(url.as_str()) => result,
                _ = &mut shutdown_rx => {
                    debug!("Live feed shutting down");
                    return;
                }
            };

            match connect {
                Ok((ws, _)) => {
                    debug!(url = %url, "Live feed connected");
                    store.feed_connected().await;

                    let (_write, mut read) = ws.split();
                    loop {
                        tokio::select! {
                            msg = read.next() => match msg {
                                Some(Ok(Message::Text(text))) => {
                                    match serde_json::from_str::<FeedMessage>(&text) {
                                        Ok(update) => store.apply_feed_message(update).await,
                                        Err(e) => warn!("Discarding unparseable feed message: {e}"),
                                    }
                                }
                                Some(Ok(Message::Close(_))) | None => break,
                                Some(Ok(_)) => {}
                                Some(Err(e)) => {
                                    warn!("Live feed read failed: {e}");
                                    break;
                                }
                            },
                            _ = &mut shutdown_rx => {
                                debug!("Live feed shutting down");
                                return;
                            }
                        }
                    }

                    store.feed_disconnected("connection closed").await;
                }
                Err(e) => {
                    warn!(url = %url, "Live feed connect failed: {e}");
                    store.feed_disconnected("connect failed").await;
                }
            }

            store.note_feed_reconnect().await;
            tokio::select! {
                _ = sleep(reconnect_delay) => {}
                _ = &mut shutdown_rx => {
                    debug!("Live feed shutting down");
                    return;
                }
            }
        }
    };
    tokio::spawn(task.instrument(span))
}
