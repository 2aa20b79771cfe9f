//! # API REST
//!
//! REST API implementation for Clinica.
//!
//! Handles:
//! - HTTP endpoints with axum (paths and JSON shapes are a fixed contract with the frontend)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, error envelopes)
//!
//! All data operations go through [`clinica_core::ClinicService`].

#![warn(rust_2018_idioms)]

mod error;
mod handlers;

use axum::{routing::get, Router};
use clinica_core::ClinicService;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

/// Application state shared across REST API handlers
///
/// Holds the clinic service, which owns the collection handles opened at startup.
#[derive(Clone)]
pub struct AppState {
    service: ClinicService,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_patients,
        handlers::create_patient,
        handlers::list_doctors,
        handlers::list_history,
        handlers::list_images,
        handlers::revenue_per_doctor,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::StoreStatus,
        api_shared::ErrorRes,
        api_shared::PatientCreatedRes,
        api_shared::RevenueEntry,
        api_shared::Document,
    ))
)]
pub struct ApiDoc;

/// Build the REST router over `service`.
///
/// Cross-origin requests are accepted from any origin; no authentication is applied.
pub fn router(service: ClinicService) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/pacienti",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route("/api/doctori", get(handlers::list_doctors))
        .route("/api/istoric", get(handlers::list_history))
        .route("/api/imagini", get(handlers::list_images))
        .route(
            "/api/analiza/venit_doctori",
            get(handlers::revenue_per_doctor),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(AppState { service })
}
