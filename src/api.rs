// REST client for the fleet backend. One method per endpoint; the poller
// decides what to do with failures.

use crate::config::BackendConfig;
use crate::models::{
    ActionRequest, ActionResponse, AssistRequest, AssistResponse, FeedMessage, FleetSnapshot,
    HistoryResponse, PriceResponse,
};
use crate::version;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response from the backend.
    #[error("request failed with status {0}")]
    Status(u16),
    #[error("request error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status(404))
    }
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &BackendConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(version::user_agent())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }
        Ok(resp.json::<T>().await?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }
        Ok(resp.json::<T>().await?)
    }

    /// Latest snapshot for every configured miner.
    pub async fn miner_data(&self) -> Result<FleetSnapshot, ApiError> {
        self.get_json("/miner-data").await
    }

    /// Persisted samples, newest `limit` rows.
    pub async fn historical_metrics(&self, limit: u32) -> Result<HistoryResponse, ApiError> {
        self.get_json(&format!("/historical-metrics?limit={limit}"))
            .await
    }

    /// Spot price with 24h change.
    pub async fn btc_price_24h(&self) -> Result<PriceResponse, ApiError> {
        self.get_json("/btc-price-24h").await
    }

    /// Plain spot price; older backends only serve this one.
    pub async fn btc_price(&self) -> Result<PriceResponse, ApiError> {
        self.get_json("/btc-price").await
    }

    /// Same payload the live feed pushes, for when the socket is down.
    pub async fn live_stats(&self) -> Result<FeedMessage, ApiError> {
        self.get_json("/api/stats").await
    }

    pub async fn add_miner(&self, name: &str, ip: &str) -> Result<ActionResponse, ApiError> {
        let body = ActionRequest {
            name: name.to_string(),
            ip: Some(ip.to_string()),
        };
        self.post_json("/add-miner", &body).await
    }

    pub async fn delete_miner(&self, name: &str) -> Result<ActionResponse, ApiError> {
        let body = ActionRequest {
            name: name.to_string(),
            ip: None,
        };
        self.post_json("/delete-miner", &body).await
    }

    pub async fn ai_assist(
        &self,
        provider: &str,
        question: &str,
    ) -> Result<AssistResponse, ApiError> {
        let body = AssistRequest {
            provider: provider.to_string(),
            question: question.to_string(),
        };
        self.post_json("/ai-assist", &body).await
    }
}
