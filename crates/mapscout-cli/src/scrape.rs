//! The default command: run one search and write its records to CSV.

use std::path::Path;
use std::time::Duration;

use mapscout_core::{write_records, AppConfig, RunConfig, SearchQuery};
use mapscout_scraper::{
    run_search, CompiledProfile, NominatimClient, SearchJob, SiteProfile, WebDriverSession,
};

use crate::Cli;

/// Loads the selector profile from `path`, or the built-in one when unset.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a selector does not parse.
pub(crate) fn load_profile(path: Option<&Path>) -> anyhow::Result<CompiledProfile> {
    let profile = match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading selector profile");
            SiteProfile::from_yaml_file(path)?
        }
        None => SiteProfile::default(),
    };
    Ok(profile.compile()?)
}

/// Per-run limits from the command line layered over the environment config.
pub(crate) fn run_config_for(config: &AppConfig, cli: &Cli) -> RunConfig {
    let poll_delay = Duration::from_secs(cli.delay);
    let mut run = RunConfig::from_app_config(config, cli.max_results, poll_delay);
    if let Some(max_scrolls) = cli.max_scrolls {
        run.max_scroll_attempts = max_scrolls;
    }
    run
}

/// Resolves, searches, extracts, and writes the CSV.
///
/// Everything that can be checked locally (query, selector profile, geocoder
/// URL) is checked before the browser session is requested.
///
/// # Errors
///
/// Returns an error for invalid input, a bad selector profile, a browser
/// session that cannot be started, or an output file that cannot be written.
/// Failures after the session starts are reported in the summary instead.
pub(crate) async fn run_scrape(config: &AppConfig, cli: &Cli) -> anyhow::Result<()> {
    let query = SearchQuery::build(&cli.term, &cli.country, cli.city.as_deref())?;
    let profile = load_profile(config.selectors_path.as_deref())?;
    let geocoder = NominatimClient::new(&config.geocoder)
        .map_err(|e| anyhow::anyhow!("failed to build geocoder client: {e}"))?;

    let job = SearchJob {
        query,
        maps_base_url: config.maps_base_url.clone(),
        config: run_config_for(config, cli),
    };

    let session = WebDriverSession::start(&config.browser).await.map_err(|e| {
        anyhow::anyhow!(
            "failed to start browser session at {}: {e}",
            config.browser.webdriver_url
        )
    })?;

    let report = run_search(&session, &geocoder, &job, &profile).await;

    write_records(&cli.output, &report.records)?;

    if let Some(reason) = &report.aborted {
        tracing::error!(reason = %reason, "run aborted before any place was visited");
        eprintln!("Run aborted: {reason}");
    }
    tracing::info!(
        output = %cli.output.display(),
        records = report.records.len(),
        discovered = report.discovered,
        skipped = report.skipped,
        geocoded = report.location.resolved,
        "run complete"
    );
    println!("Scraping complete. Found {} places.", report.records.len());
    Ok(())
}
