//! Aggregate reports served from the store's map/reduce views.
//!
//! The grouping and summing happen inside the store's incremental view index. This module
//! only asks for the grouped rows and relabels them; it never fetches the underlying
//! documents to recompute totals.

use crate::collection::Collection;
use crate::error::{ClinicError, ClinicResult};
use crate::store::{DocumentStore, StoreError, StoreResult, ViewPath, ViewRow};
use api_shared::RevenueEntry;
use serde_json::Value;

/// Revenue per doctor, read from the grouped view `view` on the treatment history.
///
/// One entry is produced per row returned by the view, in the view's order (ascending key
/// for CouchDB).
///
/// # Errors
///
/// Returns `StoreUnavailable` if the history handle is absent. Every other failure (missing
/// view, store error, malformed or non-numeric output) is reported as `Report`, naming the
/// view path so an operator can find the expected design document.
pub async fn revenue_per_doctor(
    handle: Option<&dyn DocumentStore>,
    view: &ViewPath,
) -> ClinicResult<Vec<RevenueEntry>> {
    let collection = Collection::History;
    let Some(handle) = handle else {
        return Err(ClinicError::StoreUnavailable {
            database: collection.database(),
        });
    };

    let report_error = |source: StoreError| ClinicError::Report {
        view: view.to_string(),
        database: collection.database(),
        source,
    };

    let rows = handle.grouped_view(view).await.map_err(report_error)?;
    rows.into_iter()
        .map(|row| to_revenue_entry(row).map_err(report_error))
        .collect()
}

fn to_revenue_entry(row: ViewRow) -> StoreResult<RevenueEntry> {
    let venit_total = coerce_f64(&row.value)?;
    Ok(RevenueEntry {
        id_doctor: row.key,
        venit_total,
    })
}

/// Numbers are taken as-is, booleans count as 1 or 0 and numeric strings are parsed; the
/// result must be finite.
fn coerce_f64(value: &Value) -> StoreResult<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    number
        .filter(|n| n.is_finite())
        .ok_or_else(|| StoreError::MalformedView(format!("value {value} is not a finite number")))
}
