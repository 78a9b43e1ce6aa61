use poem::handler;
use poem::http::StatusCode;
use poem::web::{Data, Json};
use poem::IntoResponse;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use sqlgate_audit::ReadinessReport;
use sqlgate_common::Deadline;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

/// Always 200: liveness only, no dependency checks (spec §6).
#[handler]
pub async fn healthz() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

/// Aggregates the three startup/readiness signals of spec §5: repository
/// connectivity, at-least-one-available adapter, metadata initialized.
#[handler]
pub async fn readyz(Data(state): Data<&Arc<AppState>>) -> impl IntoResponse {
    let deadline = Deadline::after(Duration::from_secs(2));
    let repository_connected = state.repository.check_connectivity().await.is_ok();
    let registered = state.adapters.available();
    let unhealthy = state.adapters.check_all_health(&deadline).await;
    let adapter_available = registered.len() > unhealthy.len();
    let metadata_initialized = state.metadata_initialized();

    let report: ReadinessReport = sqlgate_audit::assess(repository_connected, adapter_available, metadata_initialized);
    let status = if report.is_ready() { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    Json(report).with_status(status)
}
