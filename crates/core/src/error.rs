use crate::store::StoreError;

/// Errors surfaced by [`crate::ClinicService`] operations.
///
/// The `Display` text of each variant is the exact human-readable message sent to HTTP
/// clients in the `eroare` field, so the wording is part of the external contract.
#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    /// The store handles were never established (failed bootstrap).
    #[error("Conexiunea la baza de date {database} a eșuat")]
    StoreUnavailable { database: &'static str },

    /// The candidate record is missing, empty, or lacks the required name field.
    #[error("Date incomplete. Numele este necesar.")]
    Validation,

    #[error("Eroare la preluarea {label} din CouchDB: {source}")]
    List {
        label: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Eroare la inserarea {label}: {source}")]
    Insert {
        label: &'static str,
        #[source]
        source: StoreError,
    },

    #[error(
        "Eroare la rularea analizei MapReduce. Verificati calea '{view}' in DB {database}: {source}"
    )]
    Report {
        view: String,
        database: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ClinicError {
    /// Whether the failure was caused by the caller rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ClinicError::Validation)
    }
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;

/// Errors raised while resolving startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid CouchDB URL: {0}")]
    InvalidUrl(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
