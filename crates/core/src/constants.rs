//! Constants used throughout the Clinica core crate.
//!
//! Database names, reserved identifiers and the literals that form part of the HTTP
//! contract live here so the lister, creator and reporter agree on them.

/// Connection string used when `COUCHDB_URL` is not set.
pub const DEFAULT_COUCH_URL: &str = "http://127.0.0.1:5984/";

/// Identifier prefix of store-internal design documents (view definitions).
pub const DESIGN_DOC_PREFIX: &str = "_design/";

/// Field stamped on every created record to tag its semantic category.
pub const KIND_FIELD: &str = "tip_document";

/// Kind literal stamped on created patients.
pub const PATIENT_KIND: &str = "pacient";

/// Field a candidate patient must carry to be accepted.
pub const REQUIRED_NAME_FIELD: &str = "nume_complet";

/// Design document holding the revenue-per-doctor view.
pub const REVENUE_VIEW_DESIGN: &str = "analiza_financiara";

/// Name of the revenue-per-doctor view inside [`REVENUE_VIEW_DESIGN`].
pub const REVENUE_VIEW_NAME: &str = "analiza_financiara";

/// Confirmation message returned after a patient is stored.
pub const PATIENT_CREATED_MESSAGE: &str = "Pacient adăugat";
