use poem::Request;
use sqlgate_auth::Principal;
use sqlgate_common::GatewayError;

use crate::errors::ApiError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Extracts and resolves the bearer credential from `Authorization`
/// (spec §6). Missing header, malformed scheme, or an unknown token all
/// collapse to `Unauthenticated` — the caller never learns which.
pub async fn authenticate(req: &Request, state: &AppState) -> Result<Principal, ApiError> {
    let header = req
        .header("Authorization")
        .ok_or(GatewayError::Unauthenticated)
        .map_err(ApiError)?;

    let token = header.strip_prefix(BEARER_PREFIX).ok_or(GatewayError::Unauthenticated).map_err(ApiError)?;

    state.authenticator.authenticate(token).await.map_err(ApiError)
}
