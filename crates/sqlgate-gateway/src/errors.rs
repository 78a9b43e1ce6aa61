use poem::http::StatusCode;
use poem::web::Json;
use poem::IntoResponse;
use sqlgate_common::{ErrorBody, GatewayError};

/// Wraps [`GatewayError`] so it can be converted into a `poem::Error`
/// carrying the spec §6 error body shape and status mapping. Both
/// `GatewayError` and `poem::Error` are foreign to this crate; this
/// newtype is what makes the conversion possible.
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError(err)
    }
}

impl From<ApiError> for poem::Error {
    fn from(err: ApiError) -> Self {
        let status = StatusCode::from_u16(err.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = (&err.0).into();
        poem::Error::from_response(Json(body).with_status(status).into_response())
    }
}
