//! Single-record creation.

use crate::collection::Collection;
use crate::constants::{KIND_FIELD, REQUIRED_NAME_FIELD};
use crate::error::{ClinicError, ClinicResult};
use crate::store::DocumentStore;
use crate::Record;
use serde_json::Value;

/// Validate a candidate record, tag it with `kind` and store it.
///
/// Checks run in this order, and nothing is written unless all pass:
/// 1. the handle must exist, otherwise `StoreUnavailable` naming the database;
/// 2. the candidate must be a non-empty JSON object containing the name field, otherwise
///    `Validation`.
///
/// The kind field is overwritten even if the caller supplied one. Duplicate names are
/// accepted.
///
/// # Returns
///
/// The identifier assigned by the store. The revision is discarded.
///
/// # Errors
///
/// Returns a `ClinicError` if:
/// - the handle is absent (`StoreUnavailable`),
/// - the candidate fails validation (`Validation`),
/// - the store rejects the write (`Insert`).
pub async fn create_record(
    handle: Option<&dyn DocumentStore>,
    collection: Collection,
    candidate: Option<Value>,
    kind: &str,
) -> ClinicResult<String> {
    let Some(handle) = handle else {
        return Err(ClinicError::StoreUnavailable {
            database: collection.database(),
        });
    };

    let mut record = validate_candidate(candidate)?;
    record.insert(KIND_FIELD.into(), Value::String(kind.to_string()));

    let saved = handle
        .save(record)
        .await
        .map_err(|source| ClinicError::Insert {
            label: collection.record_label(),
            source,
        })?;

    tracing::info!("created record {} in {}", saved.id, handle.name());
    Ok(saved.id)
}

fn validate_candidate(candidate: Option<Value>) -> ClinicResult<Record> {
    match candidate {
        Some(Value::Object(record)) if record.contains_key(REQUIRED_NAME_FIELD) => Ok(record),
        _ => Err(ClinicError::Validation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PATIENT_KIND;
    use crate::lister::list_records;
    use crate::store::memory::MemoryDatabase;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_stamps_kind_over_caller_value() {
        let db = MemoryDatabase::new("pacienti");
        let candidate = json!({"nume_complet": "Ana Pop", "tip_document": "doctor", "varsta": 34});

        let id = create_record(Some(&db), Collection::Patients, Some(candidate), PATIENT_KIND)
            .await
            .expect("valid candidate should be stored");
        assert!(!id.is_empty());

        let records = list_records(Some(&db)).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["_id"], id.as_str());
        assert_eq!(records[0]["tip_document"], "pacient");
        assert_eq!(records[0]["nume_complet"], "Ana Pop");
        assert_eq!(records[0]["varsta"], 34);
    }

    #[tokio::test]
    async fn test_invalid_candidates_never_reach_the_store() {
        let db = MemoryDatabase::new("pacienti");
        let candidates = [
            None,
            Some(json!({})),
            Some(json!({"nume": "Ana Pop"})),
            Some(json!(["nume_complet"])),
            Some(json!("nume_complet")),
            Some(Value::Null),
        ];

        for candidate in candidates {
            let err = create_record(Some(&db), Collection::Patients, candidate, PATIENT_KIND)
                .await
                .expect_err("candidate should be rejected");
            assert!(matches!(err, ClinicError::Validation));
            assert!(err.is_client_error());
        }
        assert_eq!(db.document_count(), 0);
    }

    #[tokio::test]
    async fn test_absent_handle_is_unavailable_before_validation() {
        let err = create_record(None, Collection::Patients, Some(json!({})), PATIENT_KIND)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Conexiunea la baza de date pacienti a eșuat");
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_duplicate_names_are_accepted() {
        let db = MemoryDatabase::new("pacienti");
        for _ in 0..2 {
            create_record(
                Some(&db),
                Collection::Patients,
                Some(json!({"nume_complet": "Ion Ionescu"})),
                PATIENT_KIND,
            )
            .await
            .unwrap();
        }
        assert_eq!(db.document_count(), 2);
    }

    #[tokio::test]
    async fn test_store_rejection_is_an_insert_error() {
        let db = MemoryDatabase::new("pacienti");
        db.fail_with("write refused");

        let err = create_record(
            Some(&db),
            Collection::Patients,
            Some(json!({"nume_complet": "Ana Pop"})),
            PATIENT_KIND,
        )
        .await
        .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Eroare la inserarea pacientului: "));
    }

    #[tokio::test]
    async fn test_insert_error_uses_the_collection_record_label() {
        let db = MemoryDatabase::new("doctori");
        db.fail_with("write refused");

        let err = create_record(
            Some(&db),
            Collection::Doctors,
            Some(json!({"nume_complet": "Dr. Popa"})),
            "doctor",
        )
        .await
        .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Eroare la inserarea doctorului: "));
    }
}
