//! # API Shared
//!
//! Shared wire types for the Clinica APIs.
//!
//! Contains:
//! - JSON response bodies returned by the REST endpoints
//! - Shared services like `HealthService`
//!
//! Field names are part of the public HTTP contract consumed by the existing frontend and
//! must not be renamed.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod health;

pub use health::HealthService;

/// Uniform error envelope returned by every failing endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub eroare: String,
}

/// Body of a successful `POST /api/pacienti`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientCreatedRes {
    pub mesaj: String,
    /// Identifier assigned by the document store.
    pub id: String,
}

/// One row of the revenue-per-doctor report.
///
/// `id_doctor` is the grouping key exactly as emitted by the store's view, so it may be a
/// string or a number depending on how the history documents were written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RevenueEntry {
    #[schema(value_type = Object)]
    pub id_doctor: serde_json::Value,
    pub venit_total: f64,
}

/// A stored, schema-less document including the store's `_id` and `_rev` fields.
///
/// Only used to describe request and response bodies in the OpenAPI document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Document(#[schema(value_type = Object)] pub serde_json::Map<String, serde_json::Value>);

/// Connection state of the document store as seen by this process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    Connected,
    Degraded,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    pub store: StoreStatus,
}
