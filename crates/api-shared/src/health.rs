use crate::{HealthRes, StoreStatus};

/// Simple health service shared by the REST API and the CLI.
///
/// The process itself is always reported as alive; a failed store bootstrap only changes
/// the `store` field, because the API keeps serving structured errors in that state.
#[derive(Clone)]
pub struct HealthService;

impl HealthService {
    /// Build a health response for the given store connection state.
    ///
    /// # Arguments
    /// * `store_connected` - Whether the collection handles were established at startup
    ///
    /// # Returns
    /// A `HealthRes` with `ok` always set and the store status filled in.
    pub fn check_health(store_connected: bool) -> HealthRes {
        let (store, message) = if store_connected {
            (StoreStatus::Connected, "Clinica is alive")
        } else {
            (
                StoreStatus::Degraded,
                "Clinica is alive but the document store is unavailable",
            )
        };

        HealthRes {
            ok: true,
            message: message.into(),
            store,
        }
    }
}
