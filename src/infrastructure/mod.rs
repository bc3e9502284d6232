//! Infrastructure layer - external-facing implementations
//!
//! HTML parsing, document fetching, fixture persistence, configuration, and
//! logging setup.

pub mod config;
pub mod fetcher;
pub mod fixture_store;
pub mod logging;
pub mod parsing;

pub use config::AppConfig;
pub use fetcher::{DocumentFetcher, FetchError, FetchTarget, HttpFetcher};
pub use fixture_store::{FixtureStore, JsonFixtureStore, MemoryFixtureStore, StoreError};
