//! Trash backup service.
//!
//! Polls a watched directory, copies every new entry into a backup directory
//! exactly once, and pushes the entry name to connected WebSocket observers.
//! The backup directory is browsable over HTTP and accepts uploaded files.

pub mod config;
pub mod error;
pub mod fs;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
pub mod ws;

pub use config::AppConfig;
pub use state::AppState;
