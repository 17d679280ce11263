//! zg-storage-gateway library
//!
//! Shared core for the HTTP gateway (`zg-storage-gateway`) and the
//! command-line client (`zg-storage`).
//!
//! # Modules
//!
//! - `config`: Environment-driven configuration shared by both front-ends
//! - `storage`: Storage provider seam and upload/download orchestration
//! - `routes`: HTTP routes (upload, download, API docs, health)
//! - `cli`: Command-line front-end

pub mod cli;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;

pub use config::Config;
pub use state::AppState;
