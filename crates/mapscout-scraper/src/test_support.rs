//! In-memory browser and geocoder doubles for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::browser::{Browser, ElementHandle, Locator, ScrollTarget};
use crate::error::{BrowserError, GeocodeError};
use crate::geocode::{Coordinates, Geocoder};

#[derive(Default)]
struct State {
    pages: HashMap<String, String>,
    fallback_page: Option<String>,
    failing: HashSet<String>,
    current_url: Option<String>,
    observations: Vec<(u64, usize)>,
    cursor: usize,
    sidebar: bool,
    navigations: Vec<String>,
    scrolls: u32,
    document_scrolls: u32,
    quit_calls: u32,
}

impl State {
    fn current_observation(&self) -> (u64, usize) {
        self.observations
            .get(self.cursor)
            .or_else(|| self.observations.last())
            .copied()
            .unwrap_or((0, 0))
    }
}

/// Browser whose result list grows along a scripted `(extent, count)`
/// sequence, one step per scroll, and whose pages are canned HTML.
#[derive(Default)]
pub struct ScriptedBrowser {
    state: Mutex<State>,
}

impl ScriptedBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sidebar(self) -> Self {
        self.state.lock().unwrap().sidebar = true;
        self
    }

    pub fn with_observations(self, seq: &[(u64, usize)]) -> Self {
        self.state.lock().unwrap().observations = seq.to_vec();
        self
    }

    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .pages
            .insert(url.to_owned(), html.to_owned());
        self
    }

    /// Served for any URL without its own page, e.g. the search URL.
    pub fn with_fallback_page(self, html: &str) -> Self {
        self.state.lock().unwrap().fallback_page = Some(html.to_owned());
        self
    }

    pub fn with_failing_url(self, url: &str) -> Self {
        self.state.lock().unwrap().failing.insert(url.to_owned());
        self
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    pub fn scroll_count(&self) -> u32 {
        self.state.lock().unwrap().scrolls
    }

    pub fn document_scrolls(&self) -> u32 {
        self.state.lock().unwrap().document_scrolls
    }

    pub fn quit_calls(&self) -> u32 {
        self.state.lock().unwrap().quit_calls
    }
}

#[async_trait]
impl Browser for ScriptedBrowser {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        let mut state = self.state.lock().unwrap();
        state.navigations.push(url.to_owned());
        if state.failing.contains(url) {
            return Err(BrowserError::WebDriver {
                status: 500,
                error: "unknown error".to_owned(),
                message: format!("navigation to {url} failed"),
            });
        }
        state.current_url = Some(url.to_owned());
        Ok(())
    }

    async fn page_source(&self) -> Result<String, BrowserError> {
        let state = self.state.lock().unwrap();
        let url = state.current_url.clone().unwrap_or_default();
        state
            .pages
            .get(&url)
            .or(state.fallback_page.as_ref())
            .cloned()
            .ok_or_else(|| BrowserError::UnexpectedResponse {
                context: "source".to_owned(),
                reason: format!("no scripted page for {url}"),
            })
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementHandle>, BrowserError> {
        let state = self.state.lock().unwrap();
        let handles = match locator {
            Locator::Xpath(_) if state.sidebar => vec![ElementHandle("sidebar".to_owned())],
            Locator::Xpath(_) => Vec::new(),
            Locator::Css(_) => {
                let (_, count) = state.current_observation();
                (0..count)
                    .map(|i| ElementHandle(format!("anchor-{i}")))
                    .collect()
            }
        };
        Ok(handles)
    }

    async fn scroll_to_end(&self, target: &ScrollTarget) -> Result<(), BrowserError> {
        let mut state = self.state.lock().unwrap();
        state.scrolls += 1;
        if *target == ScrollTarget::Document {
            state.document_scrolls += 1;
        }
        if state.cursor + 1 < state.observations.len() {
            state.cursor += 1;
        }
        Ok(())
    }

    async fn scroll_extent(&self, _target: &ScrollTarget) -> Result<u64, BrowserError> {
        Ok(self.state.lock().unwrap().current_observation().0)
    }

    async fn quit(&self) -> Result<(), BrowserError> {
        self.state.lock().unwrap().quit_calls += 1;
        Ok(())
    }
}

/// Geocoder answering from a fixed table; unknown queries find nothing.
#[derive(Default)]
pub struct StubGeocoder {
    known: HashMap<String, Coordinates>,
}

impl StubGeocoder {
    pub fn with(mut self, query: &str, latitude: &str, longitude: &str) -> Self {
        self.known.insert(
            query.to_owned(),
            Coordinates {
                latitude: latitude.to_owned(),
                longitude: longitude.to_owned(),
            },
        );
        self
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn lookup(&self, query: &str) -> Result<Coordinates, GeocodeError> {
        self.known
            .get(query)
            .cloned()
            .ok_or_else(|| GeocodeError::NoResults {
                query: query.to_owned(),
            })
    }
}

/// Results page with one default-profile anchor per href.
pub fn anchors_page(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<div role="article"><a class="hfpxzc" href="{href}"></a></div>"#))
        .collect();
    format!(r#"<html><body><div role="feed">{anchors}</div></body></html>"#)
}

/// Detail page laid out the way the default profile expects.
pub fn detail_page(name: Option<&str>, website: Option<&str>, address: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(name) = name {
        body.push_str(&format!(r#"<h1 class="DUwDvf">{name}</h1>"#));
    }
    if let Some(website) = website {
        body.push_str(&format!(
            r#"<a data-item-id="authority" href="{website}">Website</a>"#
        ));
    }
    if let Some(address) = address {
        body.push_str(&format!(
            r#"<button data-item-id="address"><div class="Io6YTe">{address}</div></button>"#
        ));
    }
    format!("<html><body>{body}</body></html>")
}
