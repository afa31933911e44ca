use thiserror::Error;

/// Failures talking to the browser-automation endpoint.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid WebDriver endpoint \"{url}\": {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// The driver answered with a protocol-level error object.
    #[error("WebDriver error {error} (HTTP {status}): {message}")]
    WebDriver {
        status: u16,
        error: String,
        message: String,
    },

    #[error("unexpected WebDriver response for {context}: {reason}")]
    UnexpectedResponse { context: String, reason: String },

    #[error("timed out after {waited_ms}ms waiting for {what}")]
    Timeout { what: String, waited_ms: u64 },

    #[error("screenshot is not valid base64: {0}")]
    Screenshot(#[from] base64::DecodeError),
}

/// Failures resolving a place name to coordinates.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid geocoder URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("rate limited by geocoder (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no coordinates found for \"{query}\"")]
    NoResults { query: String },

    #[error("malformed coordinate \"{value}\"")]
    MalformedCoordinate { value: String },
}

/// Failures loading or compiling a site selector profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read selector profile {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse selector profile: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid CSS selector for {field} (\"{selector}\"): {reason}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        reason: String,
    },
}
