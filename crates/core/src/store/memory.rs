//! In-process document store.
//!
//! Behaves like a CouchDB database for the three primitives of [`DocumentStore`]: documents
//! are enumerated in id order, design documents live alongside ordinary ones, saved
//! documents receive generated `_id`/`_rev` values, and grouped views are evaluated by the
//! store (here: a `_sum` reduce over one key field and one value field).

use super::{
    AllDocsRow, Collections, DocumentRef, DocumentStore, StoreError, StoreResult, ViewPath, ViewRow,
};
use crate::collection::Collection;
use crate::constants::DESIGN_DOC_PREFIX;
use crate::Record;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

#[derive(Debug)]
enum ViewDefinition {
    /// Group documents by `key_field` and sum `value_field`, like a `_sum` reduce.
    Sum {
        key_field: String,
        value_field: String,
    },
    /// Pre-computed output, returned verbatim.
    Fixed(Vec<ViewRow>),
}

#[derive(Debug, Default)]
struct Inner {
    docs: BTreeMap<String, Record>,
    views: HashMap<ViewPath, ViewDefinition>,
    failure: Option<String>,
}

impl Inner {
    fn check_available(&self) -> StoreResult<()> {
        match &self.failure {
            Some(reason) => Err(StoreError::couch(503, "service_unavailable", reason.clone())),
            None => Ok(()),
        }
    }
}

/// A single in-memory database.
#[derive(Debug)]
pub struct MemoryDatabase {
    name: String,
    inner: Mutex<Inner>,
}

impl MemoryDatabase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a document synchronously. Same semantics as [`DocumentStore::save`].
    pub fn insert(&self, mut doc: Record) -> StoreResult<DocumentRef> {
        let mut inner = self.lock();
        inner.check_available()?;

        let id = match doc.get("_id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().simple().to_string(),
        };
        if inner.docs.contains_key(&id) {
            return Err(StoreError::couch(409, "conflict", "Document update conflict."));
        }

        let rev = format!("1-{}", Uuid::new_v4().simple());
        doc.insert("_id".into(), Value::String(id.clone()));
        doc.insert("_rev".into(), Value::String(rev.clone()));
        inner.docs.insert(id.clone(), doc);

        Ok(DocumentRef { id, rev })
    }

    /// Define a view that groups documents by `key_field` and sums `value_field`.
    ///
    /// The matching design document is written too, so it shows up in full scans the way a
    /// real CouchDB design document does.
    pub fn define_sum_view(&self, view: &ViewPath, key_field: &str, value_field: &str) {
        let mut inner = self.lock();

        let design_id = format!("{DESIGN_DOC_PREFIX}{}", view.design());
        let design = inner.docs.entry(design_id.clone()).or_insert_with(|| {
            let mut doc = Record::new();
            doc.insert("_id".into(), Value::String(design_id));
            doc.insert(
                "_rev".into(),
                Value::String(format!("1-{}", Uuid::new_v4().simple())),
            );
            doc.insert("views".into(), json!({}));
            doc
        });
        if let Some(Value::Object(views)) = design.get_mut("views") {
            views.insert(
                view.view().to_string(),
                json!({
                    "map": format!(
                        "function (doc) {{ if (doc.{key_field} && doc.{value_field}) {{ emit(doc.{key_field}, doc.{value_field}); }} }}"
                    ),
                    "reduce": "_sum",
                }),
            );
        }

        inner.views.insert(
            view.clone(),
            ViewDefinition::Sum {
                key_field: key_field.to_string(),
                value_field: value_field.to_string(),
            },
        );
    }

    /// Define a view whose grouped output is exactly `rows`.
    pub fn define_fixed_view(&self, view: &ViewPath, rows: Vec<ViewRow>) {
        self.lock()
            .views
            .insert(view.clone(), ViewDefinition::Fixed(rows));
    }

    /// Make every subsequent operation fail with a `503 service_unavailable` store error.
    pub fn fail_with(&self, reason: impl Into<String>) {
        self.lock().failure = Some(reason.into());
    }

    /// Number of stored documents, design documents excluded.
    pub fn document_count(&self) -> usize {
        self.lock()
            .docs
            .keys()
            .filter(|id| !id.starts_with(DESIGN_DOC_PREFIX))
            .count()
    }
}

#[async_trait]
impl DocumentStore for MemoryDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    async fn all_docs(&self) -> StoreResult<Vec<AllDocsRow>> {
        let inner = self.lock();
        inner.check_available()?;

        Ok(inner
            .docs
            .iter()
            .map(|(id, doc)| AllDocsRow {
                id: id.clone(),
                doc: Some(doc.clone()),
            })
            .collect())
    }

    async fn save(&self, doc: Record) -> StoreResult<DocumentRef> {
        self.insert(doc)
    }

    async fn grouped_view(&self, view: &ViewPath) -> StoreResult<Vec<ViewRow>> {
        let inner = self.lock();
        inner.check_available()?;

        let design_id = format!("{DESIGN_DOC_PREFIX}{}", view.design());
        match inner.views.get(view) {
            Some(ViewDefinition::Fixed(rows)) => Ok(rows.clone()),
            Some(ViewDefinition::Sum {
                key_field,
                value_field,
            }) => sum_by_key(&inner.docs, key_field, value_field),
            None if inner.docs.contains_key(&design_id) => {
                Err(StoreError::couch(404, "not_found", "missing_named_view"))
            }
            None => Err(StoreError::couch(404, "not_found", "missing")),
        }
    }
}

fn sum_by_key(
    docs: &BTreeMap<String, Record>,
    key_field: &str,
    value_field: &str,
) -> StoreResult<Vec<ViewRow>> {
    let mut groups: Vec<(Value, f64)> = Vec::new();

    for (id, doc) in docs {
        if id.starts_with(DESIGN_DOC_PREFIX) {
            continue;
        }
        let (Some(key), Some(value)) = (doc.get(key_field), doc.get(value_field)) else {
            continue;
        };
        let amount = value.as_f64().ok_or_else(|| {
            StoreError::couch(
                500,
                "builtin_reduce_error",
                format!("The _sum function requires that map values be numbers, got {value}"),
            )
        })?;

        match groups.iter_mut().find(|(k, _)| k == key) {
            Some((_, total)) => *total += amount,
            None => groups.push((key.clone(), amount)),
        }
    }

    groups.sort_by(|(a, _), (b, _)| collate(a, b));
    Ok(groups
        .into_iter()
        .map(|(key, total)| ViewRow {
            key,
            value: Value::from(total),
        })
        .collect())
}

/// View key ordering: null < booleans < numbers < strings < arrays < objects.
fn collate(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y)
            .map(|(x, y)| collate(x, y))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// A set of in-memory databases addressed by name.
#[derive(Clone, Debug, Default)]
pub struct MemoryServer {
    databases: HashMap<String, Arc<MemoryDatabase>>,
}

impl MemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A server with an empty database for each clinic collection.
    pub fn with_clinic_databases() -> Self {
        let mut server = Self::new();
        for collection in Collection::ALL {
            server.create_database(collection.database());
        }
        server
    }

    /// Create (or return the existing) database called `name`.
    pub fn create_database(&mut self, name: &str) -> Arc<MemoryDatabase> {
        self.databases
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryDatabase::new(name)))
            .clone()
    }

    pub fn database(&self, collection: Collection) -> Option<Arc<MemoryDatabase>> {
        self.databases.get(collection.database()).cloned()
    }

    /// Open every clinic database, failing if any of them does not exist.
    pub async fn connect(&self) -> StoreResult<Collections> {
        Collections::open_all(|collection| {
            let handle = self
                .database(collection)
                .map(|db| db as Arc<dyn DocumentStore>)
                .ok_or_else(|| StoreError::couch(404, "not_found", "Database does not exist."));
            std::future::ready(handle)
        })
        .await
    }
}
