pub mod config;
pub mod http_client;
pub mod persist;
pub mod players_index;
pub mod resolve;
pub mod sleeper_api;
pub mod snapshot;
pub mod summary;
pub mod weekly_fetch;
