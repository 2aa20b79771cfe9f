use crate::{ApiError, AppState};
use api_shared::{Document, ErrorRes, HealthRes, HealthService, PatientCreatedRes, RevenueEntry};
use axum::{body::Bytes, extract::State, http::StatusCode, response::Json};
use clinica_core::{Collection, Record, PATIENT_CREATED_MESSAGE};
use serde_json::Value;

async fn list(state: &AppState, collection: Collection) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state.service.list(collection).await?;
    tracing::debug!("listed {} records from {}", records.len(), collection);
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Always answers 200 while the process is up; the `store` field reports whether the
/// document store handles were established at startup.
#[axum::debug_handler]
pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health(state.service.is_connected()))
}

#[utoipa::path(
    get,
    path = "/api/pacienti",
    responses(
        (status = 200, description = "All patient documents", body = [Document]),
        (status = 500, description = "Store unavailable or failed", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<Record>>, ApiError> {
    list(&state, Collection::Patients).await
}

#[utoipa::path(
    post,
    path = "/api/pacienti",
    request_body = Document,
    responses(
        (status = 201, description = "Patient created", body = PatientCreatedRes),
        (status = 400, description = "Missing body or nume_complet", body = ErrorRes),
        (status = 500, description = "Store unavailable or write rejected", body = ErrorRes)
    )
)]
/// Create a new patient record
///
/// The body is read as raw bytes rather than through the `Json` extractor so that a missing
/// or malformed body produces the same 400 envelope as a body without `nume_complet`.
///
/// # Returns
/// * `Ok((201, Json<PatientCreatedRes>))` - Confirmation with the store-assigned id
/// * `Err(ApiError)` - 400 on validation failure, 500 on store failure
#[axum::debug_handler]
pub(crate) async fn create_patient(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<PatientCreatedRes>), ApiError> {
    let candidate = match serde_json::from_slice::<Value>(&body) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("unreadable patient body: {}", e);
            None
        }
    };

    let id = state.service.add_patient(candidate).await?;
    Ok((
        StatusCode::CREATED,
        Json(PatientCreatedRes {
            mesaj: PATIENT_CREATED_MESSAGE.into(),
            id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/doctori",
    responses(
        (status = 200, description = "All doctor documents", body = [Document]),
        (status = 500, description = "Store unavailable or failed", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_doctors(
    State(state): State<AppState>,
) -> Result<Json<Vec<Record>>, ApiError> {
    list(&state, Collection::Doctors).await
}

#[utoipa::path(
    get,
    path = "/api/istoric",
    responses(
        (status = 200, description = "All treatment history documents", body = [Document]),
        (status = 500, description = "Store unavailable or failed", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<Record>>, ApiError> {
    list(&state, Collection::History).await
}

#[utoipa::path(
    get,
    path = "/api/imagini",
    responses(
        (status = 200, description = "All medical image documents", body = [Document]),
        (status = 500, description = "Store unavailable or failed", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_images(
    State(state): State<AppState>,
) -> Result<Json<Vec<Record>>, ApiError> {
    list(&state, Collection::Images).await
}

#[utoipa::path(
    get,
    path = "/api/analiza/venit_doctori",
    responses(
        (status = 200, description = "Revenue per doctor from the grouped history view", body = [RevenueEntry]),
        (status = 500, description = "Store unavailable, view missing or malformed", body = ErrorRes)
    )
)]
/// Revenue per doctor
///
/// Served from the `analiza_financiara/analiza_financiara` view of `tratament_istoric`,
/// which must already exist in the store.
#[axum::debug_handler]
pub(crate) async fn revenue_per_doctor(
    State(state): State<AppState>,
) -> Result<Json<Vec<RevenueEntry>>, ApiError> {
    let report = state.service.revenue_per_doctor().await?;
    Ok(Json(report))
}
