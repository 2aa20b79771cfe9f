//! Collection listing.

use crate::constants::DESIGN_DOC_PREFIX;
use crate::store::{DocumentStore, StoreResult};
use crate::Record;

/// Return every document of a collection except design documents.
///
/// Performs one full scan and materialises the whole result in memory; there is no
/// pagination, filtering or sorting beyond the store's own enumeration order. Each row is
/// projected to the stored document itself, which still carries its `_id` and `_rev`.
///
/// An absent handle yields an empty list. Callers that must tell "empty collection" apart
/// from "never connected" check for the handle themselves (see
/// [`crate::ClinicService::list`]).
///
/// # Errors
///
/// Propagates any `StoreError` raised by the scan.
pub async fn list_records(handle: Option<&dyn DocumentStore>) -> StoreResult<Vec<Record>> {
    let Some(handle) = handle else {
        return Ok(Vec::new());
    };

    let rows = handle.all_docs().await?;
    Ok(rows
        .into_iter()
        .filter(|row| !row.id.starts_with(DESIGN_DOC_PREFIX))
        .filter_map(|row| row.doc)
        .collect())
}
