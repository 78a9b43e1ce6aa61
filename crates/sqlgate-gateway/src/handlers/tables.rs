use std::sync::Arc;

use poem::handler;
use poem::web::{Data, Json, Path};
use poem::{IntoResponse, Request};
use serde::{Deserialize, Serialize};

use sqlgate_capability::{parse_capability_set, parse_constraint_set, TableFormat};
use sqlgate_catalog::{PhysicalSource, TableDraft, VirtualTable};
use sqlgate_common::GatewayError;

use crate::auth::authenticate;
use crate::errors::ApiError;
use crate::state::AppState;

/// The table-definition exchange format of spec §6.
#[derive(Debug, Deserialize)]
pub struct SourcePayload {
    pub format: String,
    pub location: String,
    pub engine: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TableDefinitionPayload {
    pub name: String,
    pub description: Option<String>,
    pub sources: Vec<SourcePayload>,
    pub capabilities: Vec<String>,
    pub constraints: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TableListResponse {
    pub tables: Vec<VirtualTable>,
}

fn to_draft(name: String, payload: TableDefinitionPayload) -> Result<TableDraft, ApiError> {
    let sources = payload
        .sources
        .into_iter()
        .map(|s| -> Result<PhysicalSource, GatewayError> {
            let format = TableFormat::parse(&s.format)?;
            let source = PhysicalSource::new(format, s.location);
            Ok(match s.engine {
                Some(engine) => source.with_engine(engine),
                None => source,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(ApiError)?;

    let capabilities = parse_capability_set(&payload.capabilities).map_err(ApiError)?;
    let constraints = parse_constraint_set(&payload.constraints).map_err(ApiError)?;

    Ok(TableDraft { name, description: payload.description, sources, capabilities, constraints })
}

#[handler]
pub async fn list_tables(req: &Request, Data(state): Data<&Arc<AppState>>) -> Result<Json<TableListResponse>, ApiError> {
    authenticate(req, state).await?;
    let tables = state.repository.list().await.map_err(ApiError)?;
    Ok(Json(TableListResponse { tables }))
}

#[handler]
pub async fn get_table(req: &Request, Path(name): Path<String>, Data(state): Data<&Arc<AppState>>) -> Result<Json<VirtualTable>, ApiError> {
    authenticate(req, state).await?;
    let table = state.repository.get(&name).await.map_err(ApiError)?;
    Ok(Json(table))
}

/// Creates the table if it doesn't exist, else updates it in place — a
/// PUT is idempotent whether or not the row already existed.
#[handler]
pub async fn put_table(
    req: &Request,
    Path(name): Path<String>,
    Data(state): Data<&Arc<AppState>>,
    Json(payload): Json<TableDefinitionPayload>,
) -> Result<Json<VirtualTable>, ApiError> {
    authenticate(req, state).await?;
    if payload.name != name {
        return Err(ApiError(GatewayError::InvalidTableName { name: payload.name }));
    }

    let draft = to_draft(name.clone(), payload)?;
    let exists = state.repository.exists(&name).await.map_err(ApiError)?;
    let table = if exists {
        state.repository.update(draft).await.map_err(ApiError)?
    } else {
        state.repository.create(draft).await.map_err(ApiError)?
    };
    Ok(Json(table))
}

#[handler]
pub async fn delete_table(req: &Request, Path(name): Path<String>, Data(state): Data<&Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    authenticate(req, state).await?;
    state.repository.delete(&name).await.map_err(ApiError)?;
    Ok(poem::http::StatusCode::OK)
}
