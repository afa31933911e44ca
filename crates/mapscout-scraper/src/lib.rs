pub mod browser;
pub mod enumerate;
pub mod error;
pub mod extract;
pub mod geocode;
pub mod pipeline;
mod retry;
pub mod reveal;
pub mod selectors;

#[cfg(test)]
mod test_support;

pub use browser::{Browser, ElementHandle, Locator, ScrollTarget, WebDriverSession};
pub use enumerate::enumerate_results;
pub use error::{BrowserError, GeocodeError, ProfileError};
pub use extract::{extract_detail, extract_place};
pub use geocode::{resolve_location, Coordinates, Geocoder, NominatimClient};
pub use pipeline::{discover_places, run_search, Discovery, RunReport, SearchJob};
pub use reveal::{reveal, RevealOutcome, RevealTarget, StopReason};
pub use selectors::{CompiledProfile, FieldRule, SiteProfile};
