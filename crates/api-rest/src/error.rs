use api_shared::ErrorRes;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use clinica_core::ClinicError;

/// A `ClinicError` on its way out of a handler.
///
/// Always rendered as `{"eroare": <message>}`; only the status code tells validation
/// failures (400) apart from store failures (500).
#[derive(Debug)]
pub struct ApiError(ClinicError);

impl From<ClinicError> for ApiError {
    fn from(err: ClinicError) -> Self {
        Self(err)
    }
}

pub(crate) fn status_for(err: &ClinicError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!("request failed: {:?}", self.0);
        } else {
            tracing::warn!("request rejected: {}", self.0);
        }

        let body = ErrorRes {
            eroare: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
