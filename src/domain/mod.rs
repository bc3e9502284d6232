//! Domain layer - entity model for persisted fixtures
//!
//! Contains the record model shared by the extraction engine and the
//! fixture store: model kinds, the generic fixture record, and the typed
//! per-model field structs.

pub mod fixture;

pub use fixture::{CategoryFields, FilmFields, Fixture, ModelKind, PersonFields};
