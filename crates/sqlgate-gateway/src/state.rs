use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sqlgate_adapters::AdapterRegistry;
use sqlgate_audit::AuditLogger;
use sqlgate_auth::{Authenticator, GrantStore};
use sqlgate_catalog::TableRepository;
use sqlgate_config::GatewayConfig;
use sqlgate_router::EngineRegistry;

/// Everything a request handler needs, shared across the whole process.
/// Matches the shared-resource policy of spec §5: the repository and
/// adapter registry are read-hot/write-rare and safe to share behind
/// `Arc`; the audit logger serializes its own writes internally.
pub struct AppState {
    pub config: GatewayConfig,
    pub repository: Arc<dyn TableRepository>,
    pub engines: Arc<EngineRegistry>,
    pub adapters: Arc<AdapterRegistry>,
    pub authenticator: Arc<dyn Authenticator>,
    pub grants: Arc<dyn GrantStore>,
    pub audit: Arc<dyn AuditLogger>,
    metadata_initialized: AtomicBool,
}

impl AppState {
    pub fn new(
        config: GatewayConfig,
        repository: Arc<dyn TableRepository>,
        engines: Arc<EngineRegistry>,
        adapters: Arc<AdapterRegistry>,
        authenticator: Arc<dyn Authenticator>,
        grants: Arc<dyn GrantStore>,
        audit: Arc<dyn AuditLogger>,
    ) -> Self {
        AppState { config, repository, engines, adapters, authenticator, grants, audit, metadata_initialized: AtomicBool::new(false) }
    }

    pub fn mark_metadata_initialized(&self) {
        self.metadata_initialized.store(true, Ordering::SeqCst);
    }

    pub fn metadata_initialized(&self) -> bool {
        self.metadata_initialized.load(Ordering::SeqCst)
    }
}
