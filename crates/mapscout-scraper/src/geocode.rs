//! Coordinate resolution for the search area.
//!
//! [`resolve_location`] never fails: when the lookup errors or comes back
//! empty it logs the reason and returns [`Location::fallback`], so a run
//! always has coordinates to centre the map on.

use std::time::Duration;

use async_trait::async_trait;
use mapscout_core::{GeocoderSettings, Location};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::GeocodeError;
use crate::retry::retry_with_backoff;

/// Coordinates as decimal strings, exactly as the geocoder returned them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub latitude: String,
    pub longitude: String,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves free text to the best-matching coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::NoResults`] when nothing matches, or a transport,
    /// status, or decoding error once retries are exhausted.
    async fn lookup(&self, query: &str) -> Result<Coordinates, GeocodeError>;
}

/// Resolves `location_text`, substituting the fallback location on any failure.
pub async fn resolve_location<G>(geocoder: &G, location_text: &str) -> Location
where
    G: Geocoder + ?Sized,
{
    match geocoder.lookup(location_text).await {
        Ok(coords) => {
            tracing::info!(
                location = location_text,
                latitude = %coords.latitude,
                longitude = %coords.longitude,
                "geocoded search area"
            );
            Location::resolved(location_text, coords.latitude, coords.longitude)
        }
        Err(e) => {
            let fallback = Location::fallback(location_text);
            tracing::warn!(
                location = location_text,
                error = %e,
                latitude = %fallback.latitude,
                longitude = %fallback.longitude,
                "geocoding failed — falling back to default coordinates"
            );
            fallback
        }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Client for a Nominatim-compatible `/search` endpoint.
pub struct NominatimClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl NominatimClient {
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built, or
    /// [`GeocodeError::InvalidBaseUrl`] if `settings.base_url` does not parse.
    pub fn new(settings: &GeocoderSettings) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&settings.user_agent)
            .build()?;

        let normalised = format!("{}/", settings.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            url: settings.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            max_retries: settings.max_retries,
            backoff_base_ms: settings.backoff_base_ms,
        })
    }

    fn search_url(&self, query: &str) -> Result<Url, GeocodeError> {
        let mut url = self
            .base_url
            .join("search")
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        Ok(url)
    }

    async fn lookup_once(&self, url: &Url, query: &str) -> Result<Coordinates, GeocodeError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(GeocodeError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let places = serde_json::from_str::<Vec<NominatimPlace>>(&body).map_err(|e| {
            GeocodeError::Deserialize {
                context: format!("geocoder search for \"{query}\""),
                source: e,
            }
        })?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoResults {
                query: query.to_owned(),
            })?;

        Ok(Coordinates {
            latitude: validated_coordinate(&place.lat, 90.0)?,
            longitude: validated_coordinate(&place.lon, 180.0)?,
        })
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn lookup(&self, query: &str) -> Result<Coordinates, GeocodeError> {
        let url = self.search_url(query)?;
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.lookup_once(&url, query)
        })
        .await
    }
}

/// Checks that `raw` is a finite decimal within `±bound` and returns it trimmed.
fn validated_coordinate(raw: &str, bound: f64) -> Result<String, GeocodeError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() <= bound => Ok(trimmed.to_owned()),
        _ => Err(GeocodeError::MalformedCoordinate {
            value: raw.to_owned(),
        }),
    }
}
