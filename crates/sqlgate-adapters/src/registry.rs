use std::sync::Arc;

use dashmap::DashMap;
use sqlgate_common::{Deadline, GatewayError, Result};

use crate::adapter::Adapter;

/// A process-wide registry of adapters keyed by engine name. Write-rare
/// (populated at startup), read-hot (consulted on every request) — a
/// concurrent map is the right shape, matching the router's engine
/// registry.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: DashMap<String, Arc<dyn Adapter>>,
}

impl AdapterRegistry {
    pub fn empty() -> Self {
        AdapterRegistry { adapters: DashMap::new() }
    }

    pub fn register(&self, adapter: Arc<dyn Adapter>) {
        self.adapters.insert(adapter.name().to_string(), adapter);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Adapter>> {
        self.adapters
            .get(name)
            .map(|entry| entry.clone())
            .ok_or_else(|| GatewayError::AdapterUnavailable { name: name.to_string() })
    }

    pub fn available(&self) -> Vec<String> {
        self.adapters.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Startup invariant (spec §4.5): the HTTP surface must refuse to
    /// serve non-health endpoints while this is empty.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    pub async fn close_all(&self) {
        let adapters: Vec<Arc<dyn Adapter>> = self.adapters.iter().map(|entry| entry.value().clone()).collect();
        for adapter in adapters {
            adapter.close().await;
        }
    }

    /// Runs `check_health` against every registered adapter, bounding
    /// each probe by `deadline`, and returns the names that failed.
    pub async fn check_all_health(&self, deadline: &Deadline) -> Vec<String> {
        let adapters: Vec<Arc<dyn Adapter>> = self.adapters.iter().map(|entry| entry.value().clone()).collect();
        let mut unhealthy = Vec::new();
        for adapter in adapters {
            if adapter.check_health(deadline).await.is_err() {
                unhealthy.push(adapter.name().to_string());
            }
        }
        unhealthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::StubAdapter;
    use std::time::Duration;

    #[test]
    fn get_missing_adapter_is_unavailable() {
        let registry = AdapterRegistry::empty();
        let err = registry.get("embedded").unwrap_err();
        assert!(matches!(err, GatewayError::AdapterUnavailable { name } if name == "embedded"));
    }

    #[test]
    fn register_then_get_round_trips() {
        let registry = AdapterRegistry::empty();
        registry.register(Arc::new(StubAdapter::always_empty("embedded")));
        assert!(registry.get("embedded").is_ok());
        assert!(!registry.is_empty());
    }

    #[tokio::test]
    async fn check_all_health_reports_only_failing_adapters() {
        let registry = AdapterRegistry::empty();
        let healthy = Arc::new(StubAdapter::always_empty("embedded"));
        let unhealthy = Arc::new(StubAdapter::always_empty("mpp"));
        unhealthy.set_healthy(false);
        registry.register(healthy);
        registry.register(unhealthy);

        let deadline = Deadline::after(Duration::from_secs(1));
        let failing = registry.check_all_health(&deadline).await;
        assert_eq!(failing, vec!["mpp".to_string()]);
    }

    #[tokio::test]
    async fn close_all_closes_every_adapter() {
        let registry = AdapterRegistry::empty();
        let a = Arc::new(StubAdapter::always_empty("embedded"));
        registry.register(a.clone());
        registry.close_all().await;
        assert!(a.is_closed());
    }
}
