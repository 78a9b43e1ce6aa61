use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use poem::handler;
use poem::web::{Data, Json};
use poem::Request;
use serde::{Deserialize, Serialize};

use sqlgate_adapters::ExecResult;
use sqlgate_audit::AuditEntry;
use sqlgate_common::{Deadline, GatewayError, QueryId};
use sqlgate_planner::{plan, ExecutionPlan};
use sqlgate_sql::classify;

use crate::auth::authenticate;
use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub sql: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_capabilities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
}

async fn classify_and_plan(sql: &str, state: &AppState, principal: &sqlgate_auth::Principal) -> Result<ExecutionPlan, GatewayError> {
    let classification = classify(sql)?;
    plan(classification, principal, state.repository.as_ref(), state.grants.as_ref(), state.engines.as_ref()).await
}

fn explain_of(execution_plan: &ExecutionPlan) -> ExplainResponse {
    ExplainResponse {
        valid: true,
        error: None,
        tables: Some(execution_plan.resolved_tables.iter().map(|t| t.name.clone()).collect()),
        required_capabilities: Some(
            execution_plan.required_capabilities.iter().map(|c| c.as_str().to_string()).collect(),
        ),
        engine: Some(execution_plan.engine.clone()),
    }
}

#[handler]
pub async fn validate(req: &Request, Data(state): Data<&Arc<AppState>>, Json(body): Json<QueryRequest>) -> Result<Json<ValidateResponse>, ApiError> {
    let principal = authenticate(req, state).await?;
    match classify_and_plan(&body.sql, state, &principal).await {
        Ok(_) => Ok(Json(ValidateResponse { valid: true, error: None })),
        Err(err) => Ok(Json(ValidateResponse { valid: false, error: Some(err.kind().to_string()) })),
    }
}

#[handler]
pub async fn explain(req: &Request, Data(state): Data<&Arc<AppState>>, Json(body): Json<QueryRequest>) -> Result<Json<ExplainResponse>, ApiError> {
    let principal = authenticate(req, state).await?;
    match classify_and_plan(&body.sql, state, &principal).await {
        Ok(execution_plan) => Ok(Json(explain_of(&execution_plan))),
        Err(err) => Ok(Json(ExplainResponse {
            valid: false,
            error: Some(err.kind().to_string()),
            tables: None,
            required_capabilities: None,
            engine: None,
        })),
    }
}

/// Runs a query end to end: authenticate → classify → plan → rewrite →
/// execute → audit (spec §5 ordering guarantee within one request).
#[handler]
pub async fn execute_query(req: &Request, Data(state): Data<&Arc<AppState>>, Json(body): Json<QueryRequest>) -> Result<Json<ExecResult>, ApiError> {
    let query_id = QueryId::new();
    let principal = authenticate(req, state).await?;

    let outcome = classify_and_plan(&body.sql, state, &principal).await;
    let execution_plan = match outcome {
        Ok(execution_plan) => execution_plan,
        Err(err) => {
            record_rejection(state, query_id, &principal, Vec::new(), &err).await;
            return Err(ApiError(err));
        }
    };

    let tables: Vec<String> = execution_plan.resolved_tables.iter().map(|t| t.name.clone()).collect();
    let dominant_format = execution_plan.resolved_tables.first().map(|t| t.dominant_format());

    let rewritten = match dominant_format {
        Some(format) => sqlgate_temporal::rewrite(&body.sql, format, &execution_plan.engine),
        None => Ok(body.sql.clone()),
    };
    let rewritten = match rewritten {
        Ok(sql) => sql,
        Err(err) => {
            record_rejection(state, query_id, &principal, tables, &err).await;
            return Err(ApiError(err));
        }
    };

    let adapter = match state.adapters.get(&execution_plan.engine) {
        Ok(adapter) => adapter,
        Err(err) => {
            record_rejection(state, query_id, &principal, tables, &err).await;
            return Err(ApiError(err));
        }
    };

    let deadline = Deadline::after(Duration::from_secs(30));
    match adapter.execute(&rewritten, &deadline).await {
        Ok(result) => {
            state
                .audit
                .record(AuditEntry::accepted(query_id, principal.id.clone(), tables, Utc::now()))
                .await
                .map_err(ApiError)?;
            Ok(Json(result))
        }
        Err(err) => {
            record_rejection(state, query_id, &principal, tables, &err).await;
            Err(ApiError(err))
        }
    }
}

async fn record_rejection(state: &AppState, query_id: QueryId, principal: &sqlgate_auth::Principal, tables: Vec<String>, err: &GatewayError) {
    let entry = AuditEntry::rejected(query_id, principal.id.clone(), tables, err.kind(), Utc::now());
    let _ = state.audit.record(entry).await;
}
