//! Paginated listing walk
//!
//! Walks an inclusive range of listing pages and ingests every discovered
//! film, strictly sequentially. Any fatal condition (fetch timeout, store
//! I/O failure, unexpected page shape) aborts the run and propagates; there
//! is no retry or partial-success bookkeeping.

use crate::application::ingest::FixtureIngestor;
use crate::infrastructure::fetcher::{DocumentFetcher, FetchTarget};
use crate::infrastructure::fixture_store::FixtureStore;
use crate::infrastructure::parsing::{ListingParser, PageParser, SelectorConfig};
use anyhow::{Context, Result};
use scraper::Html;
use tracing::info;

/// Outcome counters of one crawl run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlReport {
    pub pages_walked: u32,
    pub films_ingested: usize,
}

/// Driver for the listing walk.
pub struct Crawler<'a, S, F> {
    fetcher: &'a F,
    listing_parser: ListingParser,
    ingestor: FixtureIngestor<'a, S, F>,
}

impl<'a, S, F> Crawler<'a, S, F>
where
    S: FixtureStore,
    F: DocumentFetcher,
{
    pub fn new(store: &'a S, fetcher: &'a F, selectors: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            fetcher,
            listing_parser: ListingParser::with_config(&selectors.listing)?,
            ingestor: FixtureIngestor::new(store, fetcher, selectors)?,
        })
    }

    /// Walk listing pages `first_page..=last_page` and ingest each
    /// discovered film.
    pub async fn run(&self, first_page: u32, last_page: u32) -> Result<CrawlReport> {
        let mut report = CrawlReport {
            pages_walked: 0,
            films_ingested: 0,
        };

        for page in first_page..=last_page {
            let target = FetchTarget::listing(page);
            let body = self
                .fetcher
                .fetch(&target)
                .await
                .with_context(|| format!("fetching listing page {page}"))?;
            let items = {
                let html = Html::parse_document(&body);
                self.listing_parser
                    .parse(&html, &target.path())
                    .with_context(|| format!("parsing listing page {page}"))?
            };
            info!(page, items = items.len(), "walking listing page");

            for item in items {
                self.ingestor
                    .ingest_film(&item.title, &item.slug)
                    .await
                    .with_context(|| format!("ingesting film '{}' from page {page}", item.title))?;
                report.films_ingested += 1;
            }
            report.pages_walked += 1;
        }

        info!(
            pages = report.pages_walked,
            films = report.films_ingested,
            "crawl finished"
        );
        Ok(report)
    }
}
