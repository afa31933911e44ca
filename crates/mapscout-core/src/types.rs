//! Run-scoped domain values: resolved location, result handles, and the
//! extracted place records.


/// Latitude used when geocoding fails (approximate centroid of Pakistan).
pub const FALLBACK_LATITUDE: &str = "30.3753";
/// Longitude used when geocoding fails (approximate centroid of Pakistan).
pub const FALLBACK_LONGITUDE: &str = "69.3451";

/// Written in place of a name that could not be extracted.
pub const NAME_DEFAULT: &str = "N/A";
/// Written in place of a website that could not be extracted.
pub const WEBSITE_DEFAULT: &str = "No website available";
/// Written in place of an address that could not be extracted.
pub const ADDRESS_DEFAULT: &str = "N/A";

/// A place name resolved to coordinates.
///
/// Coordinates are kept as the decimal strings the geocoder returned so they
/// can be spliced into the search URL without float formatting drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub raw_name: String,
    pub latitude: String,
    pub longitude: String,
    /// `false` when the coordinates are the fixed fallback.
    pub resolved: bool,
}

impl Location {
    #[must_use]
    pub fn resolved(raw_name: &str, latitude: String, longitude: String) -> Self {
        Self {
            raw_name: raw_name.to_owned(),
            latitude,
            longitude,
            resolved: true,
        }
    }

    /// The default location substituted when a lookup fails.
    #[must_use]
    pub fn fallback(raw_name: &str) -> Self {
        Self {
            raw_name: raw_name.to_owned(),
            latitude: FALLBACK_LATITUDE.to_owned(),
            longitude: FALLBACK_LONGITUDE.to_owned(),
            resolved: false,
        }
    }
}

/// Reference to one discovered result, consumed once by the detail extractor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultHandle {
    pub detail_url: String,
}

impl ResultHandle {
    #[must_use]
    pub fn new(detail_url: impl Into<String>) -> Self {
        Self {
            detail_url: detail_url.into(),
        }
    }
}

/// Fields extracted from one place's detail view.
///
/// Each field is independently optional. `None` means "not present on the
/// page"; the accessors and the CSV sink substitute the sentinel literals
/// ([`NAME_DEFAULT`], [`WEBSITE_DEFAULT`], [`ADDRESS_DEFAULT`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceRecord {
    pub name: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
}

impl PlaceRecord {
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(NAME_DEFAULT)
    }

    #[must_use]
    pub fn website(&self) -> &str {
        self.website.as_deref().unwrap_or(WEBSITE_DEFAULT)
    }

    #[must_use]
    pub fn address(&self) -> &str {
        self.address.as_deref().unwrap_or(ADDRESS_DEFAULT)
    }

    /// Row cells in sink column order: name, website, address.
    #[must_use]
    pub fn to_row(&self) -> [&str; 3] {
        [self.name(), self.website(), self.address()]
    }

    /// `true` when every field was extracted from the page.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.website.is_some() && self.address.is_some()
    }
}
