pub mod app_config;
pub mod config;
pub mod query;
pub mod run_config;
pub mod sink;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, BrowserSettings, GeocoderSettings};
pub use config::{load_app_config, load_app_config_from_env};
pub use query::{SearchQuery, CITY_ZOOM, COUNTRY_ZOOM};
pub use run_config::RunConfig;
pub use sink::{write_records, CSV_HEADER};
pub use types::{
    Location, PlaceRecord, ResultHandle, ADDRESS_DEFAULT, FALLBACK_LATITUDE, FALLBACK_LONGITUDE,
    NAME_DEFAULT, WEBSITE_DEFAULT,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Rejected search input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("search term must be non-empty")]
    EmptyTerm,

    #[error("country must be non-empty")]
    EmptyCountry,
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write records to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
