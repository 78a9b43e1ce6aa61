use std::sync::Arc;

use poem::handler;
use poem::web::{Data, Json};
use poem::Request;

use sqlgate_audit::{summarize, AuditSummary};

use crate::auth::authenticate;
use crate::errors::ApiError;
use crate::state::AppState;

#[handler]
pub async fn audit_summary(req: &Request, Data(state): Data<&Arc<AppState>>) -> Result<Json<AuditSummary>, ApiError> {
    authenticate(req, state).await?;
    let entries = state.audit.entries().await;
    Ok(Json(summarize(&entries)))
}
