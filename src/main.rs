//! CLI entry point: walk a range of listing pages and grow the fixture
//! store.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tmdb_fixtures::application::crawler::Crawler;
use tmdb_fixtures::infrastructure::config::AppConfig;
use tmdb_fixtures::infrastructure::fetcher::HttpFetcher;
use tmdb_fixtures::infrastructure::fixture_store::JsonFixtureStore;
use tmdb_fixtures::infrastructure::logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "tmdb-fixtures", version, about = "Film catalog crawler producing JSON fixture records")]
struct Cli {
    /// First listing page to walk (inclusive).
    #[arg(long, default_value_t = 1)]
    first_page: u32,

    /// Last listing page to walk (inclusive).
    #[arg(long, default_value_t = 4)]
    last_page: u32,

    /// Path of the fixture store file.
    #[arg(long, default_value = "data.json")]
    store: PathBuf,

    /// Site base URL.
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let mut config = AppConfig::default();
    config.store_path = cli.store;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let fetcher = HttpFetcher::new(&config.base_url, &config.user_agent, config.request_timeout())?;
    let store = JsonFixtureStore::new(&config.store_path);

    let crawler = Crawler::new(&store, &fetcher, &config.selectors)?;
    let report = crawler.run(cli.first_page, cli.last_page).await?;

    println!(
        "walked {} pages, ingested {} films into {}",
        report.pages_walked,
        report.films_ingested,
        config.store_path.display()
    );
    Ok(())
}
