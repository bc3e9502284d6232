//! Listing page parser
//!
//! Discovers the film items of one paginated listing page: each item link
//! carries the film title (natural key) and the slug of its detail page.

use super::config::ListingSelectors;
use super::{compile_selector, PageParser, ParsingError, ParsingResult};
use anyhow::Result;
use scraper::{Html, Selector};
use tracing::{debug, warn};

/// One discovered listing item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    pub title: String,
    pub slug: String,
}

/// Parser for paginated listing pages.
pub struct ListingParser {
    item_link: Selector,
}

impl ListingParser {
    /// Create a parser with the default selector rules.
    pub fn new() -> Result<Self> {
        Self::with_config(&ListingSelectors::default())
    }

    /// Create a parser with custom selector rules.
    pub fn with_config(selectors: &ListingSelectors) -> Result<Self> {
        Ok(Self {
            item_link: compile_selector(&selectors.item_link)?,
        })
    }
}

impl PageParser for ListingParser {
    type Output = Vec<ListingItem>;

    fn parse(&self, html: &Html, context: &str) -> ParsingResult<Vec<ListingItem>> {
        let mut items = Vec::new();

        for link in html.select(&self.item_link) {
            let title = link.value().attr("title").map(str::trim).unwrap_or_default();
            let slug = link
                .value()
                .attr("href")
                .and_then(|href| href.trim_end_matches('/').rsplit('/').next())
                .unwrap_or_default();
            if title.is_empty() || slug.is_empty() {
                warn!(%context, "skipping listing item without title or link");
                continue;
            }
            items.push(ListingItem {
                title: title.to_string(),
                slug: slug.to_string(),
            });
        }

        if items.is_empty() {
            return Err(ParsingError::NoItemsFound {
                context: context.to_string(),
            });
        }

        debug!(%context, count = items.len(), "discovered listing items");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_items_in_document_order() {
        let html = Html::parse_document(
            r#"
            <div class="page_wrapper">
              <div class="card"><a class="image" href="/movie/7-the-film" title="The Film"></a></div>
              <div class="card"><a class="image" href="/movie/9-other" title="Other"></a></div>
            </div>
            "#,
        );
        let items = ListingParser::new().unwrap().parse(&html, "page 1").unwrap();
        assert_eq!(
            items,
            vec![
                ListingItem {
                    title: "The Film".to_string(),
                    slug: "7-the-film".to_string()
                },
                ListingItem {
                    title: "Other".to_string(),
                    slug: "9-other".to_string()
                },
            ]
        );
    }

    #[test]
    fn empty_listing_is_an_error() {
        let html = Html::parse_document("<div class=\"page_wrapper\"></div>");
        let err = ListingParser::new().unwrap().parse(&html, "page 1").unwrap_err();
        assert!(matches!(err, ParsingError::NoItemsFound { .. }));
    }

    #[test]
    fn items_without_title_attribute_are_skipped() {
        let html = Html::parse_document(
            r#"
            <div class="card"><a class="image" href="/movie/7-the-film"></a></div>
            <div class="card"><a class="image" href="/movie/9-other" title="Other"></a></div>
            "#,
        );
        let items = ListingParser::new().unwrap().parse(&html, "page 1").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Other");
    }
}
