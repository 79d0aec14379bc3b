// BTC spot price models (GET /btc-price-24h, GET /btc-price)

use serde::{Deserialize, Serialize};

/// Spot price payload. The 24h endpoint adds `change_24h`; the plain
/// endpoint omits it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceResponse {
    pub success: bool,
    /// USD per BTC.
    pub price: Option<f64>,
    /// Percent change over the trailing 24 hours.
    pub change_24h: Option<f64>,
    pub error: Option<String>,
}
