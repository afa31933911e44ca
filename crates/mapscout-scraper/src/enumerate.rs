use std::collections::HashSet;

use mapscout_core::ResultHandle;
use reqwest::Url;
use scraper::Html;

use crate::selectors::CompiledProfile;

/// Collects result handles from a rendered results page.
///
/// Each `href` is resolved against `page_url`, so relative and absolute
/// forms of the same place collapse to one handle. Handles come back in
/// document order, one per distinct detail URL, capped at `max_results`.
/// Anchors without a resolvable http(s) `href` are skipped.
#[must_use]
pub fn enumerate_results(
    html: &str,
    page_url: &str,
    profile: &CompiledProfile,
    max_results: usize,
) -> Vec<ResultHandle> {
    let base = match Url::parse(page_url) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!(url = page_url, error = %e, "results page URL does not parse; keeping absolute links only");
            None
        }
    };
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut anchors = 0usize;
    let mut handles = Vec::new();

    for element in document.select(&profile.results_anchor) {
        anchors += 1;
        let Some(url) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_href(base.as_ref(), href))
        else {
            continue;
        };
        if seen.insert(url.clone()) {
            handles.push(ResultHandle::new(url));
        }
    }

    let unique = handles.len();
    handles.truncate(max_results);
    tracing::info!(
        anchors,
        unique,
        kept = handles.len(),
        max_results,
        "enumerated results"
    );
    handles
}

fn resolve_href(base: Option<&Url>, raw: &str) -> Option<String> {
    let href = raw.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let url = match base {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };
    matches!(url.scheme(), "http" | "https").then(|| url.into())
}
