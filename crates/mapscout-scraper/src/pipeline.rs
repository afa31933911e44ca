//! One discovery run: resolve, search, reveal, enumerate, extract.
//!
//! [`run_search`] drives one browser session for the whole run and ends it
//! on every path out. Only session acquisition (done by the caller) is fatal;
//! everything after it degrades into the returned [`RunReport`].

use mapscout_core::{Location, PlaceRecord, RunConfig, SearchQuery};

use crate::browser::Browser;
use crate::enumerate::enumerate_results;
use crate::error::BrowserError;
use crate::extract::extract_detail;
use crate::geocode::{resolve_location, Geocoder};
use crate::reveal::{reveal, RevealOutcome};
use crate::selectors::CompiledProfile;

/// Inputs for one run, fixed before it starts.
#[derive(Debug, Clone)]
pub struct SearchJob {
    pub query: SearchQuery,
    pub maps_base_url: String,
    pub config: RunConfig,
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub location: Location,
    pub search_url: String,
    /// Extracted records in result order.
    pub records: Vec<PlaceRecord>,
    /// Result handles kept after deduplication and truncation.
    pub discovered: usize,
    /// Handles whose detail view could not be read.
    pub skipped: usize,
    /// `None` if revealing failed or never ran.
    pub reveal: Option<RevealOutcome>,
    /// Set when the run stopped before extraction, with the reason.
    pub aborted: Option<String>,
}

/// Results of the browser-driven part of a run.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub records: Vec<PlaceRecord>,
    pub discovered: usize,
    pub skipped: usize,
    pub reveal: Option<RevealOutcome>,
}

/// Runs a full search, then ends the browser session whatever happened.
///
/// `browser` must not be used after this returns.
pub async fn run_search<B, G>(
    browser: &B,
    geocoder: &G,
    job: &SearchJob,
    profile: &CompiledProfile,
) -> RunReport
where
    B: Browser + ?Sized,
    G: Geocoder + ?Sized,
{
    let location = resolve_location(geocoder, &job.query.location_text()).await;
    let search_url = job.query.search_url(&job.maps_base_url, &location);
    tracing::info!(
        phrase = %job.query.phrase,
        zoom = job.query.zoom,
        url = %search_url,
        "searching"
    );

    let result = discover_places(browser, &search_url, profile, &job.config).await;

    if let Err(e) = browser.quit().await {
        tracing::warn!(error = %e, "failed to release browser session");
    }

    match result {
        Ok(discovery) => RunReport {
            location,
            search_url,
            records: discovery.records,
            discovered: discovery.discovered,
            skipped: discovery.skipped,
            reveal: discovery.reveal,
            aborted: None,
        },
        Err(e) => {
            tracing::error!(error = %e, url = %search_url, "search page could not be opened");
            RunReport {
                location,
                search_url,
                records: Vec::new(),
                discovered: 0,
                skipped: 0,
                reveal: None,
                aborted: Some(e.to_string()),
            }
        }
    }
}

/// Opens `search_url`, reveals the result list, and extracts every result.
///
/// Reveal and snapshot failures are logged and leave the result list empty or
/// partial. A failed detail view skips that one result.
///
/// # Errors
///
/// Returns the browser error only if the search page itself cannot be opened.
pub async fn discover_places<B>(
    browser: &B,
    search_url: &str,
    profile: &CompiledProfile,
    config: &RunConfig,
) -> Result<Discovery, BrowserError>
where
    B: Browser + ?Sized,
{
    browser.navigate(search_url).await?;

    let reveal_outcome = match reveal(browser, profile, config).await {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            tracing::warn!(error = %e, "revealing results failed — using what is rendered");
            None
        }
    };

    let handles = match browser.page_source().await {
        Ok(html) => enumerate_results(&html, search_url, profile, config.max_results),
        Err(e) => {
            tracing::warn!(error = %e, "could not read results page");
            Vec::new()
        }
    };

    let total = handles.len();
    let mut records = Vec::with_capacity(total);
    let mut skipped = 0usize;
    for (i, handle) in handles.iter().enumerate() {
        tracing::info!(
            index = i + 1,
            total,
            url = %handle.detail_url,
            "processing {}/{}",
            i + 1,
            total
        );
        match extract_detail(browser, handle, profile, config.poll_delay).await {
            Ok(record) => {
                tracing::info!(
                    name = record.name(),
                    website = record.website(),
                    address = record.address(),
                    "extracted place"
                );
                records.push(record);
            }
            Err(e) => {
                skipped += 1;
                tracing::warn!(url = %handle.detail_url, error = %e, "skipping place");
            }
        }
    }

    Ok(Discovery {
        records,
        discovered: total,
        skipped,
        reveal: reveal_outcome,
    })
}
