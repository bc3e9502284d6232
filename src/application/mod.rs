//! Application layer - ingestion workflows
//!
//! Coordinates the extraction engine, the document fetcher, and the fixture
//! store: per-film ingestion with reference resolution, and the paginated
//! listing walk driving it.

pub mod crawler;
pub mod ingest;

pub use crawler::{CrawlReport, Crawler};
pub use ingest::FixtureIngestor;
