//! Application state.

use std::sync::Arc;

use loyalty_ledger::LedgerEngine;
use loyalty_store::RocksStore;

use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The ledger engine (sole writer of accounts and the log).
    pub engine: Arc<LedgerEngine<RocksStore>>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        if config.service_api_key.is_none() {
            tracing::warn!("SERVICE_API_KEY not configured - earn endpoints will reject callers");
        }
        if config.admin_api_key.is_none() {
            tracing::warn!("ADMIN_API_KEY not configured - admin endpoints will reject callers");
        }

        Self {
            engine: Arc::new(LedgerEngine::new(store)),
            config,
        }
    }
}
