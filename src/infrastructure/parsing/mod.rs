//! HTML extraction rule engine
//!
//! Trait-based parsers that map a rendered document into immutable page
//! values using declarative selector and label rules. Expected absences of
//! optional fields become `None`; unexpected shapes (unknown vocabulary
//! tokens, malformed entries) abort extraction for the whole item.

pub mod config;
pub mod error;
pub mod film_parser;
pub mod listing_parser;
pub mod person_parser;

pub use config::SelectorConfig;
pub use error::{ParsingError, ParsingResult};
pub use film_parser::{CreditEntry, CreditKind, CrewRole, FilmPage, FilmParser};
pub use listing_parser::{ListingItem, ListingParser};
pub use person_parser::PersonParser;

use scraper::{ElementRef, Html, Selector};

/// Parser from a loaded document to a typed page value.
pub trait PageParser {
    type Output;

    /// Parse a document. `context` names the source (URL or slug) for error
    /// reporting and logs.
    fn parse(&self, html: &Html, context: &str) -> ParsingResult<Self::Output>;
}

/// Compile a CSS selector string at parser construction time.
pub(crate) fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, e))
}

/// Trimmed text of the first element matching `selector`, if any and
/// non-empty.
pub(crate) fn select_text(root: ElementRef<'_>, selector: &Selector) -> Option<String> {
    root.select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Attribute value of the first element matching `selector`, if any.
pub(crate) fn select_attr(root: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    root.select(selector)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(str::to_string)
}

/// Value of the labeled fact row whose label matches `label`.
///
/// Scans the rows matched by `rows`, picks the first whose label element
/// text equals `label`, and returns the row text with the label stripped.
/// The site renders `-` for facts without a value; that and an empty
/// remainder both read as absent.
pub(crate) fn labeled_fact(
    root: ElementRef<'_>,
    rows: &Selector,
    label_sel: &Selector,
    label: &str,
) -> Option<String> {
    for row in root.select(rows) {
        let Some(label_el) = row.select(label_sel).next() else {
            continue;
        };
        let row_label = label_el.text().collect::<String>();
        if row_label.trim() != label {
            continue;
        }
        let full = row.text().collect::<String>();
        let value = full
            .trim()
            .strip_prefix(row_label.trim())
            .unwrap_or("")
            .trim()
            .to_string();
        if value.is_empty() || value == "-" {
            return None;
        }
        return Some(value);
    }
    None
}
