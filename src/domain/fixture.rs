//! Fixture record model
//!
//! A fixture is one persisted entity instance: an integer `pk` assigned
//! monotonically per model kind, a namespaced model string, and a mapping of
//! field name to value. The field mapping layout (and the `pk` / `model` /
//! `fields` spelling) is the on-disk store contract and must not change.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Namespace prefix used in serialized model strings, e.g. `core.film`.
pub const MODEL_NAMESPACE: &str = "core";

/// The three entity kinds held by the fixture store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Person,
    Film,
    Category,
}

impl ModelKind {
    /// Serialized model string in `<namespace>.<modelkind>` form.
    pub fn model_str(self) -> &'static str {
        match self {
            Self::Person => "core.person",
            Self::Film => "core.film",
            Self::Category => "core.category",
        }
    }

    /// Field name used for deduplication within this model kind.
    pub fn natural_key(self) -> &'static str {
        match self {
            Self::Person | Self::Category => "name",
            Self::Film => "title",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.model_str())
    }
}

/// One persisted record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub pk: u32,
    pub model: String,
    pub fields: Map<String, Value>,
}

impl Fixture {
    pub fn new(pk: u32, kind: ModelKind, fields: Map<String, Value>) -> Self {
        Self {
            pk,
            model: kind.model_str().to_string(),
            fields,
        }
    }

    /// Whether this record belongs to the given model kind.
    pub fn is_kind(&self, kind: ModelKind) -> bool {
        self.model == kind.model_str()
    }

    /// The record's natural-key value, if present and textual.
    pub fn natural_key_value(&self, kind: ModelKind) -> Option<&str> {
        self.fields.get(kind.natural_key()).and_then(Value::as_str)
    }
}

/// Person fields as extracted from a person page. Only `name` is required;
/// every other attribute may be absent from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonFields {
    pub name: String,
    pub photo: Option<String>,
    pub gender: Option<String>,
    pub principal_role: Option<String>,
    pub birth_date: Option<String>,
    pub death_date: Option<String>,
    pub age: Option<u32>,
    pub birth_place: Option<String>,
    pub biography: Option<String>,
}

/// Category fields. There is no scraped source for a description, so it is
/// always null at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFields {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryFields {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// Film fields. `category` holds Category pks in document order; the role
/// lists and `cast` hold Person pks, partitioned by crew function. A person
/// may appear in several role lists for the same film.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmFields {
    pub title: String,
    pub original_title: String,
    pub state: Option<String>,
    pub original_language: Option<String>,
    pub budget: Option<String>,
    pub income: Option<String>,
    pub year: Option<String>,
    pub image: Option<String>,
    pub certification: Option<String>,
    pub overview: Option<String>,
    pub category: Vec<u32>,
    pub duration: Option<String>,
    pub score: Option<String>,
    pub director: Vec<u32>,
    pub characters: Vec<u32>,
    pub screenplay: Vec<u32>,
    pub story: Vec<u32>,
    pub novel: Vec<u32>,
    pub writer: Vec<u32>,
    pub cast: Vec<u32>,
}

/// Serialize typed fields into the generic mapping stored on a [`Fixture`].
pub fn field_map<T: Serialize>(fields: &T) -> serde_json::Result<Map<String, Value>> {
    match serde_json::to_value(fields)? {
        Value::Object(map) => Ok(map),
        other => Err(serde::ser::Error::custom(format!(
            "fixture fields must serialize to an object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_strings_are_namespaced_and_lowercase() {
        assert_eq!(ModelKind::Person.model_str(), "core.person");
        assert_eq!(ModelKind::Film.model_str(), "core.film");
        assert_eq!(ModelKind::Category.model_str(), "core.category");
    }

    #[test]
    fn natural_key_per_kind() {
        assert_eq!(ModelKind::Person.natural_key(), "name");
        assert_eq!(ModelKind::Category.natural_key(), "name");
        assert_eq!(ModelKind::Film.natural_key(), "title");
    }

    #[test]
    fn field_map_preserves_declaration_order() {
        let fields = CategoryFields::new("Action");
        let map = field_map(&fields).unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["name", "description"]);
        assert_eq!(map["name"], "Action");
        assert!(map["description"].is_null());
    }

    #[test]
    fn fixture_natural_key_lookup() {
        let fields = field_map(&CategoryFields::new("Drama")).unwrap();
        let fixture = Fixture::new(0, ModelKind::Category, fields);
        assert!(fixture.is_kind(ModelKind::Category));
        assert!(!fixture.is_kind(ModelKind::Film));
        assert_eq!(fixture.natural_key_value(ModelKind::Category), Some("Drama"));
    }
}
