use std::path::PathBuf;

/// Settings for the WebDriver-controlled browser session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    pub command_timeout_secs: u64,
    pub headless: bool,
    pub user_agent: String,
    pub language: String,
}

/// Settings for the geocoding lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocoderSettings {
    pub base_url: String,
    /// Descriptive client identifier; public geocoders reject anonymous agents.
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub browser: BrowserSettings,
    pub geocoder: GeocoderSettings,
    pub maps_base_url: String,
    pub max_scroll_attempts: u32,
    pub stall_retry_limit: u32,
    pub results_timeout_secs: u64,
    pub sidebar_timeout_secs: u64,
    pub selectors_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("webdriver_url", &self.browser.webdriver_url)
            .field("browser_headless", &self.browser.headless)
            .field("browser_language", &self.browser.language)
            .field("geocoder_url", &self.geocoder.base_url)
            .field("geocoder_max_retries", &self.geocoder.max_retries)
            .field("maps_base_url", &self.maps_base_url)
            .field("max_scroll_attempts", &self.max_scroll_attempts)
            .field("stall_retry_limit", &self.stall_retry_limit)
            .field("results_timeout_secs", &self.results_timeout_secs)
            .field("sidebar_timeout_secs", &self.sidebar_timeout_secs)
            .field("selectors_path", &self.selectors_path)
            .finish_non_exhaustive()
    }
}
