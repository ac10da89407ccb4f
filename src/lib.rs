pub mod config;
pub mod date_resolver;
pub mod http_client;
pub mod loader;
pub mod picks_fetch;
pub mod render;
pub mod snapshot;
pub mod state;
pub mod store;
