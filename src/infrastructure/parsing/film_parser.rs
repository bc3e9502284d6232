//! Film detail page parser
//!
//! Extracts the film field set plus the structural credit entries (cast and
//! crew with role names). Credit entries stop at the first filler element:
//! the credits grid pads its tail with placeholders, and nothing after the
//! first one is a real entry.

use super::config::{FilmFactLabels, FilmSelectors};
use super::{
    compile_selector, labeled_fact, select_attr, select_text, PageParser, ParsingError,
    ParsingResult,
};
use anyhow::Result;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Marker inside the score element's class token; the digits after it are
/// the user score percentage.
const SCORE_MARKER: &str = "-r";

/// Crew functions recognized in a credit entry's role text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrewRole {
    Director,
    Characters,
    Screenplay,
    Story,
    Novel,
    Writer,
}

impl CrewRole {
    /// Map a role name from the page to its crew function. The vocabulary
    /// is fixed; anything else is an extraction error, not a null.
    pub fn from_label(label: &str, context: &str) -> ParsingResult<Self> {
        match label {
            "Director" => Ok(Self::Director),
            "Characters" => Ok(Self::Characters),
            "Screenplay" => Ok(Self::Screenplay),
            "Story" => Ok(Self::Story),
            "Novel" => Ok(Self::Novel),
            "Writer" => Ok(Self::Writer),
            other => Err(ParsingError::UnknownRole {
                role: other.to_string(),
                context: context.to_string(),
            }),
        }
    }
}

/// How a credit entry participates in the film record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreditKind {
    /// Cast member; lands in the `cast` list.
    Cast,
    /// Crew member; lands in every named role list.
    Crew(Vec<CrewRole>),
}

/// One visited entry of the credits grid, before person resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditEntry {
    pub name: String,
    pub slug: String,
    pub kind: CreditKind,
}

/// Immutable result of parsing one film page. Person and category
/// references are still by name/slug; the ingestion service resolves them
/// to pks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmPage {
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
    pub genres: Vec<String>,
    pub duration: Option<String>,
    pub score: Option<String>,
    pub credits: Vec<CreditEntry>,
}

/// Parser for film detail pages.
pub struct FilmParser {
    title: Selector,
    year: Selector,
    image: Selector,
    certification: Selector,
    genres: Selector,
    duration: Selector,
    score: Selector,
    overview: Selector,
    people: Selector,
    person_link: Selector,
    person_roles: Selector,
    facts_row: Selector,
    fact_label: Selector,
    labels: FilmFactLabels,
}

impl FilmParser {
    /// Create a parser with the default selector rules.
    pub fn new() -> Result<Self> {
        Self::with_config(&FilmSelectors::default())
    }

    /// Create a parser with custom selector rules.
    pub fn with_config(selectors: &FilmSelectors) -> Result<Self> {
        Ok(Self {
            title: compile_selector(&selectors.title)?,
            year: compile_selector(&selectors.year)?,
            image: compile_selector(&selectors.image)?,
            certification: compile_selector(&selectors.certification)?,
            genres: compile_selector(&selectors.genres)?,
            duration: compile_selector(&selectors.duration)?,
            score: compile_selector(&selectors.score)?,
            overview: compile_selector(&selectors.overview)?,
            people: compile_selector(&selectors.people)?,
            person_link: compile_selector(&selectors.person_link)?,
            person_roles: compile_selector(&selectors.person_roles)?,
            facts_row: compile_selector(&selectors.facts_row)?,
            fact_label: compile_selector(&selectors.fact_label)?,
            labels: selectors.labels.clone(),
        })
    }

    fn fact(&self, root: ElementRef<'_>, label: &str) -> Option<String> {
        labeled_fact(root, &self.facts_row, &self.fact_label, label)
    }

    /// The release-year span renders as `(YYYY)`; the stored value is the
    /// first of January of that year.
    fn parse_year(&self, root: ElementRef<'_>) -> Option<String> {
        select_text(root, &self.year).map(|text| text.replace('(', "").replace(')', "-01-01"))
    }

    /// Read the percentage score from the score element's class token.
    fn parse_score(&self, root: ElementRef<'_>, context: &str) -> ParsingResult<Option<String>> {
        let Some(element) = root.select(&self.score).next() else {
            return Ok(None);
        };
        let class_token = element.value().attr("class").unwrap_or_default();
        let Some((_, raw)) = class_token.split_once(SCORE_MARKER) else {
            return Err(ParsingError::MalformedValue {
                field: "score".to_string(),
                value: class_token.to_string(),
                context: context.to_string(),
            });
        };
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Some(format!("{raw}%")))
        } else {
            // Not rated.
            Ok(Some("NR".to_string()))
        }
    }

    /// Walk the credits grid in document order, stopping at the first
    /// filler placeholder.
    fn parse_credits(&self, root: ElementRef<'_>, context: &str) -> ParsingResult<Vec<CreditEntry>> {
        let mut credits = Vec::new();

        for (index, entry) in root.select(&self.people).enumerate() {
            let classes: Vec<&str> = entry.value().classes().collect();
            if classes.contains(&"filler") {
                debug!(%context, index, "credit filler reached, stopping scan");
                break;
            }

            let name = select_text(entry, &self.person_link).ok_or_else(|| {
                ParsingError::malformed_credit(index, "missing person link text", context)
            })?;
            let href = select_attr(entry, &self.person_link, "href").ok_or_else(|| {
                ParsingError::malformed_credit(index, "person link has no href", context)
            })?;
            let slug = href
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    ParsingError::malformed_credit(index, "person link has an empty path", context)
                })?
                .to_string();

            let kind = if classes.contains(&"card") {
                CreditKind::Cast
            } else if classes.contains(&"profile") {
                let roles_text = select_text(entry, &self.person_roles).ok_or_else(|| {
                    ParsingError::malformed_credit(index, "crew entry has no role text", context)
                })?;
                let roles = roles_text
                    .split(", ")
                    .map(|role| CrewRole::from_label(role, context))
                    .collect::<ParsingResult<Vec<_>>>()?;
                CreditKind::Crew(roles)
            } else {
                return Err(ParsingError::malformed_credit(
                    index,
                    "entry is neither cast, crew, nor filler",
                    context,
                ));
            };

            credits.push(CreditEntry { name, slug, kind });
        }

        Ok(credits)
    }
}

impl PageParser for FilmParser {
    type Output = FilmPage;

    fn parse(&self, html: &Html, context: &str) -> ParsingResult<FilmPage> {
        let root = html.root_element();

        let title = select_text(root, &self.title)
            .ok_or_else(|| ParsingError::required_field_missing("title", context))?;

        // An untranslated title has no "original title" row; the site
        // convention is "same as the main title".
        let original_title = self
            .fact(root, &self.labels.original_title)
            .unwrap_or_else(|| title.clone());

        let genres = select_text(root, &self.genres)
            .map(|text| text.split(", ").map(str::to_string).collect())
            .unwrap_or_default();

        let page = FilmPage {
            state: self.fact(root, &self.labels.state),
            original_language: self.fact(root, &self.labels.original_language),
            budget: self.fact(root, &self.labels.budget),
            income: self.fact(root, &self.labels.income),
            year: self.parse_year(root),
            image: select_attr(root, &self.image, "src"),
            certification: select_text(root, &self.certification),
            overview: select_text(root, &self.overview),
            duration: select_text(root, &self.duration),
            score: self.parse_score(root, context)?,
            credits: self.parse_credits(root, context)?,
            genres,
            title,
            original_title,
        };

        debug!(film = %page.title, credits = page.credits.len(), %context, "extracted film fields");
        Ok(page)
    }
}
