// Library for tests to access modules

pub mod aggregate;
pub mod api;
pub mod charts;
pub mod config;
pub mod control;
pub mod feed;
pub mod models;
pub mod poller;
pub mod sample_log;
pub mod store;
pub mod tui;
pub mod version;
