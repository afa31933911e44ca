//! Search phrase and target URL construction.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::types::Location;
use crate::QueryError;

/// Zoom level when a city narrows the search (tight, dense view).
pub const CITY_ZOOM: u8 = 12;
/// Zoom level for a country-wide search (wide view).
pub const COUNTRY_ZOOM: u8 = 6;

/// Characters escaped inside a phrase word. `+` is included because it is the
/// word separator in the search path.
const PHRASE_WORD: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'+')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub country: String,
    pub city: Option<String>,
    /// Human-readable phrase typed into the map search, e.g. `"cafes in Lahore, Pakistan"`.
    pub phrase: String,
    pub zoom: u8,
}

impl SearchQuery {
    /// Builds the canonical query for `term` in `country` (optionally `city`).
    ///
    /// The term is pluralized by appending `s` unless it already ends in `s`.
    /// A blank `city` is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptyTerm`] or [`QueryError::EmptyCountry`] when
    /// the respective input is blank.
    pub fn build(term: &str, country: &str, city: Option<&str>) -> Result<Self, QueryError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(QueryError::EmptyTerm);
        }
        let country = country.trim();
        if country.is_empty() {
            return Err(QueryError::EmptyCountry);
        }
        let city = city.map(str::trim).filter(|c| !c.is_empty());

        let plural = pluralize(term);
        let (phrase, zoom) = match city {
            Some(city) => (format!("{plural} in {city}, {country}"), CITY_ZOOM),
            None => (format!("{plural} in {country}"), COUNTRY_ZOOM),
        };

        Ok(Self {
            term: term.to_owned(),
            country: country.to_owned(),
            city: city.map(str::to_owned),
            phrase,
            zoom,
        })
    }

    /// Free text handed to the geocoder: `"<city>, <country>"` or `"<country>"`.
    #[must_use]
    pub fn location_text(&self) -> String {
        match &self.city {
            Some(city) => format!("{city}, {}", self.country),
            None => self.country.clone(),
        }
    }

    /// Map-search URL centred on `location` at this query's zoom level.
    ///
    /// `maps_base` is the UI root, e.g. `https://www.google.com/maps`.
    #[must_use]
    pub fn search_url(&self, maps_base: &str, location: &Location) -> String {
        format!(
            "{}/search/{}/@{},{},{}z",
            maps_base.trim_end_matches('/'),
            encode_phrase(&self.phrase),
            location.latitude,
            location.longitude,
            self.zoom
        )
    }
}

fn pluralize(term: &str) -> String {
    if term.ends_with('s') {
        term.to_owned()
    } else {
        format!("{term}s")
    }
}

fn encode_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(|word| utf8_percent_encode(word, PHRASE_WORD).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
