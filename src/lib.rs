pub mod config;
pub mod error;
pub mod leaderboards;
pub mod log_reader;
pub mod phase;
pub mod profile;
pub mod snapshot;
pub mod stat_collection;
pub mod stats;
pub mod storage;
