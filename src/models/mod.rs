// Wire models for the fleet backend

mod control;
mod feed;
mod history;
mod miner;
mod price;

pub use control::{ActionRequest, ActionResponse, AssistRequest, AssistResponse};
pub use feed::{AsicStats, ChipStatus, ChipTemp, FeedMessage, LuxorStats, NetworkStats};
pub use history::{HistoryResponse, HistoryRow, HistorySummary};
pub use miner::{FleetSnapshot, MinerSnapshot, StatusClass};
pub use price::PriceResponse;
