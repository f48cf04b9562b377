pub mod api;
pub mod config;
pub mod feed;
pub mod http_client;
pub mod model;
pub mod router;
pub mod state;
pub mod stats;
pub mod ui;
