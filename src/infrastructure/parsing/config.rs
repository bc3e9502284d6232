//! Declarative field-location rules
//!
//! Every extracted field is addressed by a CSS selector and, for the labeled
//! facts panels, a label string (the disambiguator picking one row out of
//! several structurally identical siblings). Keeping the rules in one serde
//! config struct makes them overridable without touching parser code.

use serde::{Deserialize, Serialize};

/// All selector and label rules used by the extraction engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    pub listing: ListingSelectors,
    pub film: FilmSelectors,
    pub person: PersonSelectors,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            listing: ListingSelectors::default(),
            film: FilmSelectors::default(),
            person: PersonSelectors::default(),
        }
    }
}

/// Selectors for the paginated film listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// Item links carrying an `href` to the film page and a `title`
    /// attribute holding the film title.
    pub item_link: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            item_link: "div.card a.image".to_string(),
        }
    }
}

/// Selectors and fact labels for a film detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmSelectors {
    pub title: String,
    pub year: String,
    pub image: String,
    pub certification: String,
    pub genres: String,
    pub duration: String,
    /// Element whose `class` attribute carries the score marker token.
    pub score: String,
    pub overview: String,
    /// Credit entries in document order, trailing grid padding included.
    pub people: String,
    /// Within a credit entry: the person link (text = name, href = slug).
    pub person_link: String,
    /// Within a crew credit entry: the comma-separated role text.
    pub person_roles: String,
    /// Labeled fact rows of the right-hand facts panel.
    pub facts_row: String,
    /// Label element inside a fact row.
    pub fact_label: String,
    pub labels: FilmFactLabels,
}

impl Default for FilmSelectors {
    fn default() -> Self {
        Self {
            title: "section.poster div.title h2 a".to_string(),
            year: "section.poster div.title h2 span".to_string(),
            image: "section.poster img".to_string(),
            certification: "div.facts span.certification".to_string(),
            genres: "div.facts span.genres".to_string(),
            duration: "div.facts span.runtime".to_string(),
            score: "div.percent span".to_string(),
            overview: "div.overview p".to_string(),
            people: "ol.people > li".to_string(),
            person_link: "p a".to_string(),
            person_roles: "p.character".to_string(),
            facts_row: "section.facts p".to_string(),
            fact_label: "strong".to_string(),
            labels: FilmFactLabels::default(),
        }
    }
}

/// Disambiguator labels of the film facts panel, as rendered by the site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmFactLabels {
    pub original_title: String,
    pub state: String,
    pub original_language: String,
    pub budget: String,
    pub income: String,
}

impl Default for FilmFactLabels {
    fn default() -> Self {
        Self {
            original_title: "Título original".to_string(),
            state: "Estado".to_string(),
            original_language: "Idioma original".to_string(),
            budget: "Presupuesto".to_string(),
            income: "Ingresos".to_string(),
        }
    }
}

/// Selectors and fact labels for a person detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonSelectors {
    pub name: String,
    pub photo: String,
    pub biography: String,
    pub facts_row: String,
    pub fact_label: String,
    pub labels: PersonFactLabels,
}

impl Default for PersonSelectors {
    fn default() -> Self {
        Self {
            name: "div.title a".to_string(),
            photo: "div.image_content img".to_string(),
            biography: "div.text.initial".to_string(),
            facts_row: "section.facts p".to_string(),
            fact_label: "strong".to_string(),
            labels: PersonFactLabels::default(),
        }
    }
}

/// Disambiguator labels of the person facts panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonFactLabels {
    pub gender: String,
    pub known_for: String,
    pub death_date: String,
    pub birth_date: String,
    pub birth_place: String,
}

impl Default for PersonFactLabels {
    fn default() -> Self {
        Self {
            gender: "Sexo".to_string(),
            known_for: "Conocido por".to_string(),
            death_date: "Fecha de defunción".to_string(),
            birth_date: "Fecha de nacimiento".to_string(),
            birth_place: "Lugar de nacimiento".to_string(),
        }
    }
}
