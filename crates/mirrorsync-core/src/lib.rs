pub mod config;
pub mod logging;

pub mod checksum;
pub mod coordinator;
pub mod executor;
pub mod fetch;
pub mod host_stats;
pub mod item;
pub mod listing;
pub mod mirror;
pub mod progress;
pub mod scheduler;
pub mod sources;
pub mod state;
pub mod url_model;
