//! Per-place field extraction from a detail view.

use std::time::Duration;

use mapscout_core::{PlaceRecord, ResultHandle};
use scraper::Html;

use crate::browser::Browser;
use crate::error::BrowserError;
use crate::selectors::{CompiledField, CompiledProfile};

/// Opens one detail view, waits for it to render, and extracts its fields.
///
/// # Errors
///
/// Returns the browser error if navigation or the snapshot read fails. Missing
/// fields are not errors.
pub async fn extract_detail<B>(
    browser: &B,
    handle: &ResultHandle,
    profile: &CompiledProfile,
    delay: Duration,
) -> Result<PlaceRecord, BrowserError>
where
    B: Browser + ?Sized,
{
    browser.navigate(&handle.detail_url).await?;
    tokio::time::sleep(delay).await;
    let html = browser.page_source().await?;
    Ok(extract_place(&html, profile))
}

/// Reads name, website, and address from a detail-view snapshot.
///
/// Each field is looked up on its own; one missing field never affects the others.
#[must_use]
pub fn extract_place(html: &str, profile: &CompiledProfile) -> PlaceRecord {
    let document = Html::parse_document(html);
    PlaceRecord {
        name: extract_field(&document, &profile.name),
        website: extract_field(&document, &profile.website),
        address: extract_field(&document, &profile.address),
    }
}

fn extract_field(document: &Html, field: &CompiledField) -> Option<String> {
    let element = document.select(&field.selector).next()?;
    let raw = match &field.attribute {
        Some(attr) => element.value().attr(attr)?.to_owned(),
        None => element.text().collect::<String>(),
    };
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}
