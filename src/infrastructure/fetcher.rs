//! Document accessor boundary
//!
//! One fetch operation parameterized by target path and readiness marker.
//! The marker is the CSS class whose presence means the page finished
//! rendering its dynamic content; a document without it is treated as a
//! failed load, the synchronous stand-in for a bounded render wait. Fetches
//! have a fixed timeout and are never retried.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// A fetchable page of the source site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTarget {
    Listing { page: u32 },
    Film { slug: String },
    Person { slug: String },
}

impl FetchTarget {
    pub fn listing(page: u32) -> Self {
        Self::Listing { page }
    }

    pub fn film(slug: impl Into<String>) -> Self {
        Self::Film { slug: slug.into() }
    }

    pub fn person(slug: impl Into<String>) -> Self {
        Self::Person { slug: slug.into() }
    }

    /// Path of this target relative to the site base URL.
    pub fn path(&self) -> String {
        match self {
            Self::Listing { page } => format!("/movie?page={page}"),
            Self::Film { slug } => format!("/movie/{slug}"),
            Self::Person { slug } => format!("/person/{slug}"),
        }
    }

    /// Class of the element whose presence marks the document as ready.
    pub fn ready_marker(&self) -> &'static str {
        match self {
            Self::Listing { .. } => "page_wrapper",
            Self::Film { .. } => "single_column",
            Self::Person { .. } => "content_wrapper",
        }
    }
}

impl std::fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}")]
    Http { status: u16, url: String },

    #[error("document at {url} never became ready (no '{marker}' element)")]
    NotReady { url: String, marker: &'static str },
}

/// Boundary consumed by the ingestion side: fetch a target and wait until
/// the document is ready, returning its body.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, target: &FetchTarget) -> Result<String, FetchError>;
}

/// HTTP implementation over a single reqwest session (cookies kept for the
/// process lifetime, matching the one-browser-session model).
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("invalid base URL '{base_url}'"))?;
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .cookie_store(true)
            .build()?;
        Ok(Self { client, base_url })
    }

    fn url_for(&self, target: &FetchTarget) -> String {
        format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            target.path()
        )
    }
}

/// Whether the body contains the readiness marker element.
fn document_is_ready(body: &str, marker: &str) -> bool {
    let selector = match Selector::parse(&format!(".{marker}")) {
        Ok(selector) => selector,
        Err(_) => return false,
    };
    Html::parse_document(body).select(&selector).next().is_some()
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, target: &FetchTarget) -> Result<String, FetchError> {
        let url = self.url_for(target);
        debug!(%url, "fetching document");

        let map_err = |e: reqwest::Error, url: &str| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Request {
                    url: url.to_string(),
                    source: e,
                }
            }
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| map_err(e, &url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await.map_err(|e| map_err(e, &url))?;

        if !document_is_ready(&body, target.ready_marker()) {
            return Err(FetchError::NotReady {
                url,
                marker: target.ready_marker(),
            });
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_paths() {
        assert_eq!(FetchTarget::listing(3).path(), "/movie?page=3");
        assert_eq!(FetchTarget::film("7-the-film").path(), "/movie/7-the-film");
        assert_eq!(FetchTarget::person("42-jane").path(), "/person/42-jane");
    }

    #[test]
    fn readiness_markers_per_target() {
        assert_eq!(FetchTarget::listing(1).ready_marker(), "page_wrapper");
        assert_eq!(FetchTarget::film("x").ready_marker(), "single_column");
        assert_eq!(FetchTarget::person("x").ready_marker(), "content_wrapper");
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(HttpFetcher::new("not a url", "agent/1", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn readiness_check_requires_marker_element() {
        assert!(document_is_ready(
            r#"<div class="single_column wide"></div>"#,
            "single_column"
        ));
        assert!(!document_is_ready("<div class=\"other\"></div>", "single_column"));
    }
}
