//! Browser capability surface consumed by the discovery pipeline.
//!
//! The pipeline only needs six things from a browser: navigate, read the
//! rendered document, find elements, scroll a target to its end, measure a
//! target's scrollable extent, and wait for an element to appear. Anything
//! implementing [`Browser`] can drive a run; [`WebDriverSession`] is the
//! production implementation.

mod webdriver;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BrowserError;

pub use webdriver::WebDriverSession;

/// Upper bound on the pause between polls in [`Browser::wait_for`].
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How to find elements in the rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locator {
    Css(String),
    Xpath(String),
}

impl Locator {
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::Xpath(expr.into())
    }

    /// W3C WebDriver location strategy name and value.
    #[must_use]
    pub fn strategy(&self) -> (&'static str, &str) {
        match self {
            Self::Css(s) => ("css selector", s),
            Self::Xpath(s) => ("xpath", s),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css `{s}`"),
            Self::Xpath(s) => write!(f, "xpath `{s}`"),
        }
    }
}

/// Opaque reference to a live element in the browser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub String);

/// What the revealer scrolls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollTarget {
    /// A scrollable container, normally the results sidebar.
    Element(ElementHandle),
    /// The whole document, used when no container could be located.
    Document,
}

/// The browser operations a discovery run is built from.
///
/// Every method reports failures as [`BrowserError`].
#[async_trait]
pub trait Browser: Send + Sync {
    /// Loads `url` and waits for the browser to report the navigation done.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver rejects the URL or the page fails to load.
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    /// Serialized HTML of the currently rendered document.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot serialize the document.
    async fn page_source(&self) -> Result<String, BrowserError>;

    /// Every element matching `locator`, in document order. No match is `Ok(vec![])`.
    ///
    /// # Errors
    ///
    /// Returns an error if the locator is rejected or the driver call fails.
    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementHandle>, BrowserError>;

    /// # Errors
    ///
    /// Returns an error if the scroll script fails, for example on a stale
    /// element.
    async fn scroll_to_end(&self, target: &ScrollTarget) -> Result<(), BrowserError>;

    /// Scrollable height of `target` in pixels.
    ///
    /// # Errors
    ///
    /// Returns an error if the measuring script fails or returns a non-number.
    async fn scroll_extent(&self, target: &ScrollTarget) -> Result<u64, BrowserError>;

    /// Ends the session. Further calls on this browser are invalid.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver could not close the session.
    async fn quit(&self) -> Result<(), BrowserError>;

    /// Polls until `locator` matches at least one element, returning the first.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Timeout`] when nothing matched within `timeout`,
    /// or any error raised by [`Browser::find_all`].
    async fn wait_for(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<ElementHandle, BrowserError> {
        let started = tokio::time::Instant::now();
        let deadline = started + timeout;
        loop {
            if let Some(first) = self.find_all(locator).await?.into_iter().next() {
                return Ok(first);
            }
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return Err(BrowserError::Timeout {
                    what: locator.to_string(),
                    waited_ms: u64::try_from(now.duration_since(started).as_millis())
                        .unwrap_or(u64::MAX),
                });
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL.min(deadline - now)).await;
        }
    }
}
