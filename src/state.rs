//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::storage::{StorageProvider, TransferService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    transfers: TransferService,
}

impl AppState {
    /// Create a new application state around a storage provider
    pub fn new(config: Config, provider: Arc<dyn StorageProvider>) -> Self {
        let transfers = TransferService::new(provider).with_verify_proof(config.client.verify_proof);

        Self {
            inner: Arc::new(AppStateInner { config, transfers }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the transfer service
    pub fn transfers(&self) -> &TransferService {
        &self.inner.transfers
    }
}
