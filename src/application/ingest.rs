//! Film ingestion with reference resolution
//!
//! Turns one discovered listing item into a persisted film record. Category
//! and person references are resolved (or lazily created) before the film
//! record is appended, so every pk inside a film's lists already exists in
//! the store. Person pages are fetched only on a store miss.

use crate::domain::fixture::{field_map, CategoryFields, FilmFields, ModelKind};
use crate::infrastructure::fetcher::{DocumentFetcher, FetchTarget};
use crate::infrastructure::fixture_store::FixtureStore;
use crate::infrastructure::parsing::{
    CreditKind, CrewRole, FilmPage, FilmParser, PageParser, PersonParser, SelectorConfig,
};
use anyhow::{Context, Result};
use scraper::Html;
use tracing::{debug, info};

/// Person pks partitioned by crew function, accumulated in document order.
/// Scratch state local to one ingestion; never exposed.
#[derive(Debug, Default)]
struct RoleLists {
    director: Vec<u32>,
    characters: Vec<u32>,
    screenplay: Vec<u32>,
    story: Vec<u32>,
    novel: Vec<u32>,
    writer: Vec<u32>,
    cast: Vec<u32>,
}

impl RoleLists {
    fn push(&mut self, role: CrewRole, pk: u32) {
        match role {
            CrewRole::Director => self.director.push(pk),
            CrewRole::Characters => self.characters.push(pk),
            CrewRole::Screenplay => self.screenplay.push(pk),
            CrewRole::Story => self.story.push(pk),
            CrewRole::Novel => self.novel.push(pk),
            CrewRole::Writer => self.writer.push(pk),
        }
    }
}

/// Ingestion service over an injected store and fetcher.
pub struct FixtureIngestor<'a, S, F> {
    store: &'a S,
    fetcher: &'a F,
    film_parser: FilmParser,
    person_parser: PersonParser,
}

impl<'a, S, F> FixtureIngestor<'a, S, F>
where
    S: FixtureStore,
    F: DocumentFetcher,
{
    pub fn new(store: &'a S, fetcher: &'a F, selectors: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            store,
            fetcher,
            film_parser: FilmParser::with_config(&selectors.film)?,
            person_parser: PersonParser::with_config(&selectors.person)?,
        })
    }

    /// Ingest one film by natural key and detail-page slug. Returns the
    /// film's pk; re-ingesting a known title is a no-op without a fetch.
    pub async fn ingest_film(&self, title: &str, slug: &str) -> Result<u32> {
        if let Some(pk) = self.store.find_by_natural_key(ModelKind::Film, title)? {
            debug!(film = %title, pk, "film already ingested");
            return Ok(pk);
        }

        let target = FetchTarget::film(slug);
        let body = self
            .fetcher
            .fetch(&target)
            .await
            .with_context(|| format!("fetching film page {target}"))?;
        let page = {
            let html = Html::parse_document(&body);
            self.film_parser
                .parse(&html, &target.path())
                .with_context(|| format!("extracting film '{title}'"))?
        };

        let category = self.resolve_categories(&page.genres)?;
        let roles = self.resolve_credits(&page).await?;

        let fields = FilmFields {
            title: page.title.clone(),
            original_title: page.original_title,
            state: page.state,
            original_language: page.original_language,
            budget: page.budget,
            income: page.income,
            year: page.year,
            image: page.image,
            certification: page.certification,
            overview: page.overview,
            category,
            duration: page.duration,
            score: page.score,
            director: roles.director,
            characters: roles.characters,
            screenplay: roles.screenplay,
            story: roles.story,
            novel: roles.novel,
            writer: roles.writer,
            cast: roles.cast,
        };
        let fields = field_map(&fields)?;

        let pk = self.store.get_or_create(ModelKind::Film, title, || fields)?;
        info!(film = %title, pk, "film ingested");
        Ok(pk)
    }

    /// Resolve genre names to Category pks in document order. Duplicate
    /// names within one film are kept, not collapsed.
    fn resolve_categories(&self, genres: &[String]) -> Result<Vec<u32>> {
        let mut pks = Vec::with_capacity(genres.len());
        for name in genres {
            let fields = field_map(&CategoryFields::new(name.clone()))?;
            let pk = self
                .store
                .get_or_create(ModelKind::Category, name, || fields)?;
            pks.push(pk);
        }
        Ok(pks)
    }

    /// Resolve every credit entry to a person pk and partition into role
    /// lists. Entries are visited strictly in document order, one fetch in
    /// flight at a time.
    async fn resolve_credits(&self, page: &FilmPage) -> Result<RoleLists> {
        let mut roles = RoleLists::default();
        for entry in &page.credits {
            let pk = self.resolve_person(&entry.name, &entry.slug).await?;
            match &entry.kind {
                CreditKind::Cast => roles.cast.push(pk),
                CreditKind::Crew(crew_roles) => {
                    for role in crew_roles {
                        roles.push(*role, pk);
                    }
                }
            }
        }
        Ok(roles)
    }

    /// Person pk by natural key, creating the record from a freshly fetched
    /// person page on a miss.
    async fn resolve_person(&self, name: &str, slug: &str) -> Result<u32> {
        if let Some(pk) = self.store.find_by_natural_key(ModelKind::Person, name)? {
            return Ok(pk);
        }

        let target = FetchTarget::person(slug);
        let body = self
            .fetcher
            .fetch(&target)
            .await
            .with_context(|| format!("fetching person page {target}"))?;
        let fields = {
            let html = Html::parse_document(&body);
            self.person_parser
                .parse(&html, &target.path())
                .with_context(|| format!("extracting person '{name}'"))?
        };
        let fields = field_map(&fields)?;

        let pk = self.store.get_or_create(ModelKind::Person, name, || fields)?;
        debug!(person = %name, pk, "person created");
        Ok(pk)
    }
}
