use std::sync::Arc;

use poem::handler;
use poem::web::{Data, Json, Path};
use poem::Request;
use serde::Serialize;

use sqlgate_common::GatewayError;
use sqlgate_router::EngineSnapshot;

use crate::auth::authenticate;
use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct EngineListResponse {
    pub engines: Vec<EngineSnapshot>,
}

#[handler]
pub async fn list_engines(req: &Request, Data(state): Data<&Arc<AppState>>) -> Result<Json<EngineListResponse>, ApiError> {
    authenticate(req, state).await?;
    Ok(Json(EngineListResponse { engines: state.engines.all() }))
}

#[handler]
pub async fn get_engine(req: &Request, Path(name): Path<String>, Data(state): Data<&Arc<AppState>>) -> Result<Json<EngineSnapshot>, ApiError> {
    authenticate(req, state).await?;
    let engine = state
        .engines
        .all()
        .into_iter()
        .find(|e| e.name == name)
        .ok_or_else(|| GatewayError::NotFound { name: name.clone() })
        .map_err(ApiError)?;
    Ok(Json(engine))
}
