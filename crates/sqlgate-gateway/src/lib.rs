//! The HTTP surface (spec §4.8/§6, component C8): request pipeline
//! auth → classify → plan → (validate|explain|execute) → audit, plus
//! health/readiness, catalog admin, and engine introspection endpoints.

mod auth;
mod errors;
mod handlers;
pub mod logging;
mod routes;
mod state;

pub use routes::build_routes;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use sqlgate_adapters::{AdapterRegistry, StubAdapter};
    use sqlgate_audit::InMemoryAuditLogger;
    use sqlgate_auth::{InMemoryGrantStore, StaticAuthenticator};
    use sqlgate_catalog::InMemoryTableRepository;
    use sqlgate_config::GatewayConfig;
    use sqlgate_router::EngineRegistry;

    use poem::test::TestClient;

    fn test_state() -> Arc<AppState> {
        let config = GatewayConfig {
            listen_address: "127.0.0.1:0".to_string(),
            bearer_credential: "test-token".to_string(),
            repository_url: "memory://".to_string(),
            adapters: vec![],
            dev_mode: true,
        };

        let repository = Arc::new(InMemoryTableRepository::new());
        let engines = Arc::new(EngineRegistry::with_defaults());
        let adapters = Arc::new(AdapterRegistry::empty());
        adapters.register(Arc::new(StubAdapter::always_empty("embedded")));

        let authenticator = Arc::new(
            StaticAuthenticator::new()
                .with_token("test-token", sqlgate_auth::Principal::new("u1", "alice", vec!["analyst".to_string()])),
        );
        let grants = Arc::new(InMemoryGrantStore::new());
        grants.grant_all("analyst", "demo.events", [sqlgate_capability::Capability::Read]);

        let audit = Arc::new(InMemoryAuditLogger::default());

        let state = Arc::new(AppState::new(config, repository, engines, adapters, authenticator, grants, audit));
        state.mark_metadata_initialized();
        state
    }

    #[tokio::test]
    async fn healthz_is_always_ok() {
        let client = TestClient::new(build_routes(test_state()));
        let resp = client.get("/healthz").send().await;
        resp.assert_status_is_ok();
    }

    #[tokio::test]
    async fn tables_endpoint_requires_authentication() {
        let client = TestClient::new(build_routes(test_state()));
        let resp = client.get("/tables").send().await;
        resp.assert_status(poem::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn tables_endpoint_succeeds_with_valid_bearer_token() {
        let client = TestClient::new(build_routes(test_state()));
        let resp = client.get("/tables").header("Authorization", "Bearer test-token").send().await;
        resp.assert_status_is_ok();
    }

    #[tokio::test]
    async fn validate_reports_invalid_for_a_missing_table() {
        let client = TestClient::new(build_routes(test_state()));
        let resp = client
            .post("/query/validate")
            .header("Authorization", "Bearer test-token")
            .body_json(&serde_json::json!({ "sql": "SELECT * FROM demo.missing" }))
            .send()
            .await;
        resp.assert_status_is_ok();
        let json = resp.json().await;
        json.value().object().get("valid").assert_bool(false);
    }
}
