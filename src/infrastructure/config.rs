//! Application configuration
//!
//! Defaults target themoviedb.org with a single polite session. The page
//! range is supplied on the command line; everything else lives here so
//! tests and alternative deployments can inject their own values.

use crate::infrastructure::parsing::SelectorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Site base URL; target paths are appended to it.
    pub base_url: String,

    /// User agent sent with every request.
    pub user_agent: String,

    /// Fixed per-request timeout in seconds. A timeout is fatal; there is
    /// no retry.
    pub request_timeout_secs: u64,

    /// Path of the persisted fixture collection.
    pub store_path: PathBuf,

    /// Field-location rules for the extraction engine.
    pub selectors: SelectorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.themoviedb.org".to_string(),
            user_agent: concat!("tmdb-fixtures/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: 10,
            store_path: PathBuf::from("data.json"),
            selectors: SelectorConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_source_site() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, "https://www.themoviedb.org");
        assert_eq!(config.store_path, PathBuf::from("data.json"));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }
}
