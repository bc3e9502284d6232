//! Fixture store
//!
//! A keyed record collection, one logical model per entity kind, supporting
//! natural-key lookup, monotonic pk assignment, and append-on-create. The
//! file-backed store performs a whole-collection read-modify-write per
//! creation so every creation is visible to subsequent lookups within the
//! same run. Records are never mutated or deleted.

use crate::domain::fixture::{Fixture, ModelKind};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("fixture store I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fixture store holds malformed JSON at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Contract shared by the persistent store and the in-memory test store.
///
/// Suppliers passed to [`FixtureStore::get_or_create`] are lazy: they run
/// only when the natural key is absent. Reference resolution (which needs
/// fetching) happens before this call, so suppliers never re-enter the
/// store.
pub trait FixtureStore {
    /// Pk of the first record of `kind` whose natural key equals `key`.
    fn find_by_natural_key(&self, kind: ModelKind, key: &str) -> Result<Option<u32>, StoreError>;

    /// One greater than the maximum existing pk for `kind`, or 0.
    fn next_pk(&self, kind: ModelKind) -> Result<u32, StoreError>;

    /// Assign the next pk, append the record, and return the pk.
    fn create(&self, kind: ModelKind, fields: Map<String, Value>) -> Result<u32, StoreError>;

    /// Return the existing pk for `key`, or create the record from the
    /// supplied fields. At most one record is ever appended per key.
    fn get_or_create<F>(&self, kind: ModelKind, key: &str, supplier: F) -> Result<u32, StoreError>
    where
        F: FnOnce() -> Map<String, Value>,
        Self: Sized,
    {
        if let Some(pk) = self.find_by_natural_key(kind, key)? {
            debug!(model = %kind, key, pk, "fixture already present");
            return Ok(pk);
        }
        self.create(kind, supplier())
    }
}

fn max_pk(fixtures: &[Fixture], kind: ModelKind) -> Option<u32> {
    fixtures
        .iter()
        .filter(|f| f.is_kind(kind))
        .map(|f| f.pk)
        .max()
}

fn find_in(fixtures: &[Fixture], kind: ModelKind, key: &str) -> Option<u32> {
    fixtures
        .iter()
        .filter(|f| f.is_kind(kind))
        .find(|f| f.natural_key_value(kind) == Some(key))
        .map(|f| f.pk)
}

/// File-backed store: a single JSON array of fixture objects, pretty-printed
/// with 2-space indentation, rewritten whole on every creation. The file is
/// opened and closed per operation. A missing file reads as an empty
/// collection; any other I/O or JSON failure is fatal and not retried.
pub struct JsonFixtureStore {
    path: PathBuf,
}

impl JsonFixtureStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<Fixture>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&raw).map_err(|e| StoreError::Json {
            path: self.path.clone(),
            source: e,
        })
    }

    fn persist(&self, fixtures: &[Fixture]) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(fixtures).map_err(|e| StoreError::Json {
            path: self.path.clone(),
            source: e,
        })?;
        fs::write(&self.path, raw).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl FixtureStore for JsonFixtureStore {
    fn find_by_natural_key(&self, kind: ModelKind, key: &str) -> Result<Option<u32>, StoreError> {
        Ok(find_in(&self.load()?, kind, key))
    }

    fn next_pk(&self, kind: ModelKind) -> Result<u32, StoreError> {
        Ok(max_pk(&self.load()?, kind).map_or(0, |pk| pk + 1))
    }

    fn create(&self, kind: ModelKind, fields: Map<String, Value>) -> Result<u32, StoreError> {
        let mut fixtures = self.load()?;
        let pk = max_pk(&fixtures, kind).map_or(0, |pk| pk + 1);
        fixtures.push(Fixture::new(pk, kind, fields));
        self.persist(&fixtures)?;
        info!(model = %kind, pk, total = fixtures.len(), "fixture created");
        Ok(pk)
    }
}

/// In-memory store with the same contract, for tests and dry runs.
pub struct MemoryFixtureStore {
    fixtures: Mutex<Vec<Fixture>>,
}

impl MemoryFixtureStore {
    pub fn new() -> Self {
        Self {
            fixtures: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the current collection, in creation order.
    pub fn snapshot(&self) -> Vec<Fixture> {
        self.fixtures.lock().expect("fixture store lock poisoned").clone()
    }
}

impl Default for MemoryFixtureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureStore for MemoryFixtureStore {
    fn find_by_natural_key(&self, kind: ModelKind, key: &str) -> Result<Option<u32>, StoreError> {
        let fixtures = self.fixtures.lock().expect("fixture store lock poisoned");
        Ok(find_in(&fixtures, kind, key))
    }

    fn next_pk(&self, kind: ModelKind) -> Result<u32, StoreError> {
        let fixtures = self.fixtures.lock().expect("fixture store lock poisoned");
        Ok(max_pk(&fixtures, kind).map_or(0, |pk| pk + 1))
    }

    fn create(&self, kind: ModelKind, fields: Map<String, Value>) -> Result<u32, StoreError> {
        let mut fixtures = self.fixtures.lock().expect("fixture store lock poisoned");
        let pk = max_pk(&fixtures, kind).map_or(0, |pk| pk + 1);
        fixtures.push(Fixture::new(pk, kind, fields));
        Ok(pk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixture::{field_map, CategoryFields};
    use tempfile::tempdir;

    fn category_fields(name: &str) -> Map<String, Value> {
        field_map(&CategoryFields::new(name)).unwrap()
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFixtureStore::new(dir.path().join("data.json"));
        assert_eq!(store.find_by_natural_key(ModelKind::Film, "x").unwrap(), None);
        assert_eq!(store.next_pk(ModelKind::Film).unwrap(), 0);
    }

    #[test]
    fn pks_are_monotonic_and_independent_per_model() {
        let dir = tempdir().unwrap();
        let store = JsonFixtureStore::new(dir.path().join("data.json"));

        for (i, name) in ["Action", "Adventure", "Drama"].iter().enumerate() {
            let pk = store.create(ModelKind::Category, category_fields(name)).unwrap();
            assert_eq!(pk, i as u32);
        }
        // An independent sequence for another model kind.
        let mut person = Map::new();
        person.insert("name".to_string(), Value::from("Jane Doe"));
        assert_eq!(store.create(ModelKind::Person, person).unwrap(), 0);
        assert_eq!(store.next_pk(ModelKind::Category).unwrap(), 3);
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = JsonFixtureStore::new(dir.path().join("data.json"));

        let first = store
            .get_or_create(ModelKind::Category, "Action", || category_fields("Action"))
            .unwrap();
        let second = store
            .get_or_create(ModelKind::Category, "Action", || category_fields("Action"))
            .unwrap();
        assert_eq!(first, second);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let all: Vec<Fixture> = serde_json::from_str(&raw).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn supplier_runs_only_on_miss() {
        let store = MemoryFixtureStore::new();
        store
            .get_or_create(ModelKind::Category, "Action", || category_fields("Action"))
            .unwrap();

        let mut called = false;
        store
            .get_or_create(ModelKind::Category, "Action", || {
                called = true;
                category_fields("Action")
            })
            .unwrap();
        assert!(!called);
    }

    #[test]
    fn creations_are_visible_to_subsequent_lookups() {
        let dir = tempdir().unwrap();
        let store = JsonFixtureStore::new(dir.path().join("data.json"));
        let pk = store.create(ModelKind::Category, category_fields("Action")).unwrap();
        assert_eq!(
            store.find_by_natural_key(ModelKind::Category, "Action").unwrap(),
            Some(pk)
        );
    }

    #[test]
    fn persisted_format_matches_the_store_contract() {
        let dir = tempdir().unwrap();
        let store = JsonFixtureStore::new(dir.path().join("data.json"));
        store.create(ModelKind::Category, category_fields("Action")).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        // 2-space indented array of {pk, model, fields} objects.
        assert!(raw.starts_with("[\n  {"));
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        let record = &parsed.as_array().unwrap()[0];
        assert_eq!(record["pk"], 0);
        assert_eq!(record["model"], "core.category");
        assert_eq!(record["fields"]["name"], "Action");
        assert!(record["fields"]["description"].is_null());
    }

    #[test]
    fn malformed_store_file_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFixtureStore::new(&path);
        assert!(matches!(
            store.find_by_natural_key(ModelKind::Film, "x"),
            Err(StoreError::Json { .. })
        ));
    }
}
