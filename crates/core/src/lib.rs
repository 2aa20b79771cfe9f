//! # Clinica Core
//!
//! Core data operations for the Clinica document facade.
//!
//! This crate contains the store-facing logic only:
//! - Opening handles to the five clinic databases of a CouchDB server
//! - Listing every record of a collection (design documents excluded)
//! - Creating a patient record from a schema-less candidate
//! - Reading the revenue-per-doctor report from a grouped map/reduce view
//!
//! **No API concerns**: HTTP routing, CORS and response shaping belong in `api-rest`.

pub mod collection;
pub mod config;
pub mod constants;
pub mod creator;
pub mod error;
pub mod lister;
pub mod reporter;
pub mod service;
pub mod store;

/// A stored document: an open mapping from field name to JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;

pub use collection::{Collection, UnknownCollection};
pub use config::{couch_url_from_env_value, CoreConfig};
pub use constants::{DEFAULT_COUCH_URL, PATIENT_CREATED_MESSAGE};
pub use error::{ClinicError, ClinicResult, ConfigError, ConfigResult};
pub use service::ClinicService;
pub use store::couch::{CouchDatabase, CouchServer};
pub use store::memory::{MemoryDatabase, MemoryServer};
pub use store::{Collections, DocumentStore, StoreError, StoreResult, ViewPath, ViewRow};
