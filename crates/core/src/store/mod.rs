//! Document store client contract.
//!
//! Every collection handle is an `Arc<dyn DocumentStore>`. The trait exposes only the three
//! primitives the facade needs from a CouchDB-style database:
//!
//! - a full scan of all documents (`_all_docs?include_docs=true`),
//! - inserting one document (`POST /{db}`),
//! - querying a pre-built map/reduce view with grouping enabled.
//!
//! Two implementations are provided: [`couch::CouchServer`] talks HTTP to a real CouchDB,
//! while [`memory::MemoryServer`] keeps documents in process and is used by tests and local
//! development.

pub mod couch;
pub mod memory;

use crate::collection::Collection;
use crate::Record;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid server address: {0}")]
    InvalidAddress(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Error answered by the store itself, in CouchDB's `{error, reason}` shape.
    #[error("({status}) {error}: {reason}")]
    Couch {
        status: u16,
        error: String,
        reason: String,
    },
    #[error("failed to decode store response: {0}")]
    Decode(String),
    #[error("malformed view output: {0}")]
    MalformedView(String),
}

impl StoreError {
    pub(crate) fn couch(status: u16, error: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Couch {
            status,
            error: error.into(),
            reason: reason.into(),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// One row of a full-scan result.
#[derive(Clone, Debug, Deserialize)]
pub struct AllDocsRow {
    pub id: String,
    #[serde(default)]
    pub doc: Option<Record>,
}

/// One `(key, value)` row of a grouped view query.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ViewRow {
    #[serde(default)]
    pub key: Value,
    #[serde(default)]
    pub value: Value,
}

/// Identifier and revision assigned by the store to a newly saved document.
#[derive(Clone, Debug, Deserialize)]
pub struct DocumentRef {
    pub id: String,
    pub rev: String,
}

/// Location of a view: design document name plus view name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ViewPath {
    design: String,
    view: String,
}

impl ViewPath {
    pub fn new(design: impl Into<String>, view: impl Into<String>) -> Self {
        Self {
            design: design.into(),
            view: view.into(),
        }
    }

    pub fn design(&self) -> &str {
        &self.design
    }

    pub fn view(&self) -> &str {
        &self.view
    }
}

impl fmt::Display for ViewPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.design, self.view)
    }
}

/// Handle to one database of the document store.
#[async_trait]
pub trait DocumentStore: Send + Sync + fmt::Debug {
    /// Name of the database this handle points at.
    fn name(&self) -> &str;

    /// Enumerate every document, design documents included, in the store's native order.
    async fn all_docs(&self) -> StoreResult<Vec<AllDocsRow>>;

    /// Insert a new document and return the identifier and revision the store assigned.
    async fn save(&self, doc: Record) -> StoreResult<DocumentRef>;

    /// Query a map/reduce view with `group=true`, one row per distinct key.
    async fn grouped_view(&self, view: &ViewPath) -> StoreResult<Vec<ViewRow>>;
}

/// Handles for the five clinic databases, opened together.
///
/// A `Collections` value only exists once every database was reachable; partial
/// connections are never exposed.
#[derive(Clone, Debug)]
pub struct Collections {
    patients: Arc<dyn DocumentStore>,
    doctors: Arc<dyn DocumentStore>,
    history: Arc<dyn DocumentStore>,
    appointments: Arc<dyn DocumentStore>,
    images: Arc<dyn DocumentStore>,
}

impl Collections {
    /// Open every collection with `open`, failing on the first database that cannot be opened.
    pub(crate) async fn open_all<F, Fut>(mut open: F) -> StoreResult<Self>
    where
        F: FnMut(Collection) -> Fut,
        Fut: std::future::Future<Output = StoreResult<Arc<dyn DocumentStore>>>,
    {
        Ok(Self {
            patients: open(Collection::Patients).await?,
            doctors: open(Collection::Doctors).await?,
            history: open(Collection::History).await?,
            appointments: open(Collection::Appointments).await?,
            images: open(Collection::Images).await?,
        })
    }

    pub fn get(&self, collection: Collection) -> &dyn DocumentStore {
        let handle = match collection {
            Collection::Patients => &self.patients,
            Collection::Doctors => &self.doctors,
            Collection::History => &self.history,
            Collection::Appointments => &self.appointments,
            Collection::Images => &self.images,
        };
        handle.as_ref()
    }
}
