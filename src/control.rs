//! Fleet control actions behind the dashboard prompts.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::store::{JournalLevel, Store};

/// Registers a miner with the backend. On success the poller is nudged so the
/// grid picks up the new rig without waiting out the current interval.
pub async fn add_miner(
    api: Arc<ApiClient>,
    store: Arc<Store>,
    refresh_tx: mpsc::Sender<()>,
    name: String,
    ip: String,
) {
    let name = name.trim();
    let ip = ip.trim();
    if name.is_empty() {
        store
            .note(JournalLevel::Error, "Miner name is required.".to_string())
            .await;
        return;
    }
    if ip.is_empty() {
        store
            .note(
                JournalLevel::Error,
                "IP address required for new miner.".to_string(),
            )
            .await;
        return;
    }

    match api.add_miner(name, ip).await {
        Ok(reply) => {
            let level = if reply.success {
                JournalLevel::Info
            } else {
                JournalLevel::Error
            };
            store.note(level, reply.display().to_string()).await;
            if reply.success {
                info!(name, ip, "Miner added");
                let _ = refresh_tx.try_send(());
            }
        }
        Err(e) => {
            warn!("add-miner request failed: {e}");
            store.note(JournalLevel::Error, format!("Error: {e}")).await;
        }
    }
}

pub async fn delete_miner(
    api: Arc<ApiClient>,
    store: Arc<Store>,
    refresh_tx: mpsc::Sender<()>,
    name: String,
) {
    let name = name.trim();
    if name.is_empty() {
        store
            .note(JournalLevel::Error, "Miner name is required.".to_string())
            .await;
        return;
    }

    match api.delete_miner(name).await {
        Ok(reply) => {
            let level = if reply.success {
                JournalLevel::Info
            } else {
                JournalLevel::Error
            };
            store.note(level, reply.display().to_string()).await;
            if reply.success {
                info!(name, "Miner deleted");
                let _ = refresh_tx.try_send(());
            }
        }
        Err(e) => {
            warn!("delete-miner request failed: {e}");
            store.note(JournalLevel::Error, format!("Error: {e}")).await;
        }
    }
}

/// Relays a question through the backend and journals the reply.
pub async fn ai_assist(api: Arc<ApiClient>, store: Arc<Store>, provider: String, question: String) {
    let question = question.trim();
    if question.is_empty() {
        store
            .note(
                JournalLevel::Error,
                "Please enter a prompt for the GPT engine.".to_string(),
            )
            .await;
        return;
    }

    store
        .note(JournalLevel::Info, format!("Routing question via {provider}"))
        .await;
    match api.ai_assist(&provider, question).await {
        Ok(reply) => {
            let level = if reply.success {
                JournalLevel::Info
            } else {
                JournalLevel::Error
            };
            store.note(level, reply.display().to_string()).await;
        }
        Err(e) => {
            warn!("ai-assist request failed: {e}");
            store.note(JournalLevel::Error, format!("Error: {e}")).await;
        }
    }
}
