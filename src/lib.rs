//! tmdb-fixtures - Film catalog crawler producing JSON fixture records
//!
//! Walks a paginated film listing, extracts structured film and person
//! attributes via declarative selector rules, and persists everything as a
//! deduplicated fixture collection keyed by natural identity (film title,
//! person/category name).

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::crawler::Crawler;
pub use application::ingest::FixtureIngestor;
pub use domain::fixture::{Fixture, ModelKind};
pub use infrastructure::fixture_store::{FixtureStore, JsonFixtureStore, MemoryFixtureStore};
