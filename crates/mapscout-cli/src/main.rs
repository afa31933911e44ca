use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod check;
mod scrape;

#[derive(Debug, Parser)]
#[command(name = "mapscout")]
#[command(about = "Collect business listings from a map search into a CSV file")]
struct Cli {
    /// What to search for, e.g. "hotel" or "cafe"
    #[arg(default_value = "business")]
    term: String,

    /// Maximum number of places to visit
    #[arg(default_value_t = 50)]
    max_results: usize,

    #[arg(long, default_value = "Pakistan")]
    country: String,

    /// Narrow the search to one city
    #[arg(long)]
    city: Option<String>,

    /// Seconds to wait after each scroll and each place page load
    #[arg(long, short = 't', visible_alias = "sleep", default_value_t = 5)]
    delay: u64,

    /// CSV file to write (overwritten)
    #[arg(long, default_value = "urls_scraped.csv")]
    output: PathBuf,

    /// Override MAPSCOUT_MAX_SCROLL_ATTEMPTS for this run
    #[arg(long)]
    max_scrolls: Option<u32>,

    /// Open a page in the browser, save a screenshot, and exit
    #[arg(long)]
    check_browser: bool,

    /// Screenshot path for --check-browser
    #[arg(long, default_value = "test_screenshot.png", requires = "check_browser")]
    screenshot: PathBuf,

    /// Page opened by --check-browser
    #[arg(long, default_value = "https://www.google.com", requires = "check_browser")]
    check_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = mapscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "configuration loaded");

    if cli.check_browser {
        return check::run_browser_check(&config, &cli.check_url, &cli.screenshot).await;
    }
    scrape::run_scrape(&config, &cli).await
}
