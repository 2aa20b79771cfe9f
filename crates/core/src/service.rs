//! Clinic service: the application context shared by the REST handlers and the CLI.

use crate::collection::Collection;
use crate::config::CoreConfig;
use crate::constants::PATIENT_KIND;
use crate::error::{ClinicError, ClinicResult};
use crate::store::couch::CouchServer;
use crate::store::{Collections, DocumentStore};
use crate::{creator, lister, reporter, Record};
use api_shared::RevenueEntry;
use serde_json::Value;
use std::sync::Arc;

/// Pure clinic data operations - no API concerns.
///
/// Holds the collection handles opened at startup. When the bootstrap failed the handles
/// are absent and every operation answers `StoreUnavailable` instead of panicking, so the
/// process keeps serving structured errors.
#[derive(Clone, Debug)]
pub struct ClinicService {
    cfg: Arc<CoreConfig>,
    collections: Option<Collections>,
}

impl ClinicService {
    /// Creates a service over already-opened handles (or none, for a degraded service).
    pub fn new(cfg: Arc<CoreConfig>, collections: Option<Collections>) -> Self {
        Self { cfg, collections }
    }

    /// Connect to the CouchDB server named in `cfg`.
    ///
    /// A failed connection is logged and yields a degraded service rather than an error.
    pub async fn bootstrap(cfg: Arc<CoreConfig>) -> Self {
        let redacted = cfg.redacted_couch_url();
        let connected = match CouchServer::new(cfg.couch_url()) {
            Ok(server) => server.connect().await,
            Err(e) => Err(e),
        };

        match connected {
            Ok(collections) => {
                tracing::info!("++ Connected to CouchDB at {}", redacted);
                Self::new(cfg, Some(collections))
            }
            Err(e) => {
                tracing::error!(
                    "CouchDB connection to {} failed, serving degraded: {}",
                    redacted,
                    e
                );
                Self::new(cfg, None)
            }
        }
    }

    /// Whether the collection handles were established.
    pub fn is_connected(&self) -> bool {
        self.collections.is_some()
    }

    fn handle(&self, collection: Collection) -> Option<&dyn DocumentStore> {
        self.collections.as_ref().map(|c| c.get(collection))
    }

    /// List every record of `collection`, design documents excluded.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` when the store was never connected, so an empty
    /// collection (`Ok(vec![])`) is distinguishable from a missing connection.
    /// Store failures are returned as `List`, labelled with the collection.
    pub async fn list(&self, collection: Collection) -> ClinicResult<Vec<Record>> {
        let handle = self.handle(collection).ok_or(ClinicError::StoreUnavailable {
            database: collection.database(),
        })?;

        lister::list_records(Some(handle))
            .await
            .map_err(|source| ClinicError::List {
                label: collection.label(),
                source,
            })
    }

    /// Create a patient from a caller-supplied candidate document.
    ///
    /// # Returns
    ///
    /// The identifier assigned by the store.
    pub async fn add_patient(&self, candidate: Option<Value>) -> ClinicResult<String> {
        let collection = Collection::Patients;
        creator::create_record(self.handle(collection), collection, candidate, PATIENT_KIND).await
    }

    /// Revenue per doctor from the treatment history's grouped view.
    pub async fn revenue_per_doctor(&self) -> ClinicResult<Vec<RevenueEntry>> {
        reporter::revenue_per_doctor(self.handle(Collection::History), self.cfg.revenue_view())
            .await
    }
}
