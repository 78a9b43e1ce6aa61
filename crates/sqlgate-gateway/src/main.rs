use std::sync::Arc;

use anyhow::Context;
use poem::listener::TcpListener;
use poem::Server;

use sqlgate_adapters::{AdapterRegistry, StubAdapter};
use sqlgate_audit::InMemoryAuditLogger;
use sqlgate_auth::{AllowAllGrantStore, StaticAuthenticator};
use sqlgate_catalog::InMemoryTableRepository;
use sqlgate_config::GatewayConfig;
use sqlgate_gateway::{build_routes, logging, AppState};
use sqlgate_router::EngineRegistry;

/// Wires the dev-mode bootstrap described in spec §6's "Environment/
/// configuration inputs": an in-memory repository and an allow-all grant
/// store stand in for a durable backend until a real deployment supplies
/// its own. A production binary would read `config.repository_url` and
/// construct a SQL-backed repository instead.
fn build_state(config: GatewayConfig) -> Arc<AppState> {
    let repository = Arc::new(InMemoryTableRepository::new());
    let engines = Arc::new(EngineRegistry::with_defaults());

    let adapters = Arc::new(AdapterRegistry::empty());
    for engine in engines.all() {
        adapters.register(Arc::new(StubAdapter::always_empty(&engine.name)));
    }

    let authenticator = Arc::new(StaticAuthenticator::new().with_token(
        config.bearer_credential.clone(),
        sqlgate_auth::Principal::new("dev", "dev-user", vec!["admin".to_string()]),
    ));
    let grants = Arc::new(AllowAllGrantStore);
    let audit = Arc::new(InMemoryAuditLogger::default());

    let state = Arc::new(AppState::new(config, repository, engines, adapters, authenticator, grants, audit));
    state.mark_metadata_initialized();
    state
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = GatewayConfig::from_env().context("loading gateway configuration")?;
    config.validate().context("validating gateway configuration")?;

    let listen_address = config.listen_address.clone();
    let state = build_state(config);
    let app = build_routes(state);

    tracing::info!(listen_address = %listen_address, "starting sqlgate-gateway");

    Server::new(TcpListener::bind(&listen_address))
        .run_with_graceful_shutdown(app, shutdown_signal(), Some(std::time::Duration::from_secs(10)))
        .await
        .context("gateway server exited with an error")?;

    Ok(())
}

/// Waits for SIGINT or SIGTERM so the server can drain in-flight
/// requests before exiting (spec §6 "Process signals").
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
