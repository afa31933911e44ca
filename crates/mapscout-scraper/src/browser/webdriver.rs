//! W3C WebDriver client over HTTP/JSON (geckodriver, chromedriver, Selenium).

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use mapscout_core::BrowserSettings;
use reqwest::{Client, Method, Url};
use serde_json::{json, Value};

use super::{Browser, ElementHandle, Locator, ScrollTarget};
use crate::error::BrowserError;

/// Key under which WebDriver serializes element references.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

const SCROLL_ELEMENT_JS: &str = "arguments[0].scrollTo(0, arguments[0].scrollHeight);";
const SCROLL_DOCUMENT_JS: &str = "window.scrollTo(0, document.body.scrollHeight);";
const EXTENT_ELEMENT_JS: &str = "return arguments[0].scrollHeight;";
const EXTENT_DOCUMENT_JS: &str = "return document.body.scrollHeight;";

/// One live browser session on a WebDriver endpoint.
///
/// Construct with [`WebDriverSession::start`]; release with [`Browser::quit`].
/// The session is not released on drop because release is an HTTP call.
pub struct WebDriverSession {
    client: Client,
    base_url: Url,
    session_id: String,
}

impl WebDriverSession {
    /// Opens a new Firefox session with the configured headless mode,
    /// user-agent override, and language preference.
    ///
    /// # Errors
    ///
    /// - [`BrowserError::InvalidEndpoint`] if `webdriver_url` is not a URL.
    /// - [`BrowserError::Http`] if the endpoint cannot be reached.
    /// - [`BrowserError::WebDriver`] if the driver refuses to create a session.
    /// - [`BrowserError::UnexpectedResponse`] if no session id is returned.
    pub async fn start(settings: &BrowserSettings) -> Result<Self, BrowserError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.command_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        // Ensure exactly one trailing slash so `join` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", settings.webdriver_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| BrowserError::InvalidEndpoint {
            url: settings.webdriver_url.clone(),
            reason: e.to_string(),
        })?;

        let body = json!({ "capabilities": { "alwaysMatch": firefox_capabilities(settings) } });
        let response = send(&client, &base_url, Method::POST, "session", Some(&body)).await?;
        let session_id = parse_session_id(&response)?;

        tracing::info!(session_id = %session_id, endpoint = %base_url, "browser session started");
        Ok(Self {
            client,
            base_url,
            session_id,
        })
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Title of the current document.
    ///
    /// # Errors
    ///
    /// Propagates transport and protocol errors.
    pub async fn title(&self) -> Result<String, BrowserError> {
        let value = self.command(Method::GET, "title", None).await?;
        as_string(value, "title")
    }

    /// PNG screenshot of the current viewport.
    ///
    /// # Errors
    ///
    /// Propagates transport and protocol errors, and [`BrowserError::Screenshot`]
    /// if the payload is not valid base64.
    pub async fn screenshot_png(&self) -> Result<Vec<u8>, BrowserError> {
        let value = self.command(Method::GET, "screenshot", None).await?;
        let encoded = as_string(value, "screenshot")?;
        Ok(base64::engine::general_purpose::STANDARD.decode(encoded.as_bytes())?)
    }

    async fn command(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, BrowserError> {
        let path = format!("session/{}/{endpoint}", self.session_id);
        send(&self.client, &self.base_url, method, &path, body).await
    }

    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, BrowserError> {
        let body = json!({ "script": script, "args": args });
        self.command(Method::POST, "execute/sync", Some(&body)).await
    }
}

#[async_trait]
impl Browser for WebDriverSession {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.command(Method::POST, "url", Some(&json!({ "url": url })))
            .await?;
        Ok(())
    }

    async fn page_source(&self) -> Result<String, BrowserError> {
        let value = self.command(Method::GET, "source", None).await?;
        as_string(value, "source")
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementHandle>, BrowserError> {
        let (using, selector) = locator.strategy();
        let body = json!({ "using": using, "value": selector });
        let value = self.command(Method::POST, "elements", Some(&body)).await?;
        parse_elements(&value)
    }

    async fn scroll_to_end(&self, target: &ScrollTarget) -> Result<(), BrowserError> {
        let (script, args) = match target {
            ScrollTarget::Element(el) => (SCROLL_ELEMENT_JS, vec![element_arg(el)]),
            ScrollTarget::Document => (SCROLL_DOCUMENT_JS, Vec::new()),
        };
        self.execute(script, args).await?;
        Ok(())
    }

    async fn scroll_extent(&self, target: &ScrollTarget) -> Result<u64, BrowserError> {
        let (script, args) = match target {
            ScrollTarget::Element(el) => (EXTENT_ELEMENT_JS, vec![element_arg(el)]),
            ScrollTarget::Document => (EXTENT_DOCUMENT_JS, Vec::new()),
        };
        let value = self.execute(script, args).await?;
        parse_extent(&value)
    }

    async fn quit(&self) -> Result<(), BrowserError> {
        let path = format!("session/{}", self.session_id);
        send(&self.client, &self.base_url, Method::DELETE, &path, None).await?;
        tracing::info!(session_id = %self.session_id, "browser session released");
        Ok(())
    }
}

fn firefox_capabilities(settings: &BrowserSettings) -> Value {
    let args: Vec<&str> = if settings.headless {
        vec!["-headless"]
    } else {
        Vec::new()
    };
    json!({
        "browserName": "firefox",
        "moz:firefoxOptions": {
            "args": args,
            "prefs": {
                "general.useragent.override": settings.user_agent,
                "intl.accept_languages": settings.language,
            }
        }
    })
}

fn element_arg(el: &ElementHandle) -> Value {
    json!({ ELEMENT_KEY: el.0 })
}

/// Sends one WebDriver command and unwraps the `value` member of the reply.
async fn send(
    client: &Client,
    base_url: &Url,
    method: Method,
    path: &str,
    body: Option<&Value>,
) -> Result<Value, BrowserError> {
    let url = base_url
        .join(path)
        .map_err(|e| BrowserError::InvalidEndpoint {
            url: format!("{base_url}{path}"),
            reason: e.to_string(),
        })?;

    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(body);
    }
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    let parsed: Value = serde_json::from_str(&text).map_err(|e| BrowserError::UnexpectedResponse {
        context: path.to_owned(),
        reason: format!("body is not JSON ({e}): {}", truncate(&text, 200)),
    })?;
    let value = parsed.get("value").cloned().unwrap_or(Value::Null);

    if !status.is_success() {
        let error = value
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_owned();
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        return Err(BrowserError::WebDriver {
            status: status.as_u16(),
            error,
            message,
        });
    }

    Ok(value)
}

fn parse_session_id(value: &Value) -> Result<String, BrowserError> {
    value
        .get("sessionId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| BrowserError::UnexpectedResponse {
            context: "new session".to_owned(),
            reason: "missing sessionId".to_owned(),
        })
}

fn parse_elements(value: &Value) -> Result<Vec<ElementHandle>, BrowserError> {
    let items = value
        .as_array()
        .ok_or_else(|| BrowserError::UnexpectedResponse {
            context: "find elements".to_owned(),
            reason: "expected an array".to_owned(),
        })?;
    Ok(items
        .iter()
        .filter_map(|item| item.get(ELEMENT_KEY).and_then(Value::as_str))
        .map(|id| ElementHandle(id.to_owned()))
        .collect())
}

fn parse_extent(value: &Value) -> Result<u64, BrowserError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    match value.as_f64() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(f) if f.is_finite() && f >= 0.0 => Ok(f.round() as u64),
        _ => Err(BrowserError::UnexpectedResponse {
            context: "scroll extent".to_owned(),
            reason: format!("expected a non-negative number, got {value}"),
        }),
    }
}

fn as_string(value: Value, context: &str) -> Result<String, BrowserError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(BrowserError::UnexpectedResponse {
            context: context.to_owned(),
            reason: format!("expected a string, got {}", truncate(&other.to_string(), 80)),
        }),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(headless: bool) -> BrowserSettings {
        BrowserSettings {
            webdriver_url: "http://localhost:4444".to_owned(),
            command_timeout_secs: 5,
            headless,
            user_agent: "test-agent".to_owned(),
            language: "en-US".to_owned(),
        }
    }

    #[test]
    fn capabilities_request_headless_firefox() {
        let caps = firefox_capabilities(&settings(true));
        assert_eq!(caps["browserName"], "firefox");
        assert_eq!(caps["moz:firefoxOptions"]["args"], json!(["-headless"]));
        assert_eq!(
            caps["moz:firefoxOptions"]["prefs"]["general.useragent.override"],
            "test-agent"
        );
        assert_eq!(
            caps["moz:firefoxOptions"]["prefs"]["intl.accept_languages"],
            "en-US"
        );
    }

    #[test]
    fn capabilities_without_headless_have_no_args() {
        let caps = firefox_capabilities(&settings(false));
        assert_eq!(caps["moz:firefoxOptions"]["args"], json!([]));
    }

    #[test]
    fn parse_elements_skips_foreign_entries() {
        let value = json!([
            { ELEMENT_KEY: "a" },
            { "ELEMENT": "legacy" },
            { ELEMENT_KEY: "b" }
        ]);
        let handles = parse_elements(&value).unwrap();
        assert_eq!(
            handles,
            vec![ElementHandle("a".to_owned()), ElementHandle("b".to_owned())]
        );
    }

    #[test]
    fn parse_elements_rejects_non_array() {
        assert!(matches!(
            parse_elements(&json!({})),
            Err(BrowserError::UnexpectedResponse { .. })
        ));
    }

    #[test]
    fn parse_extent_accepts_integers_and_floats() {
        assert_eq!(parse_extent(&json!(1200)).unwrap(), 1200);
        assert_eq!(parse_extent(&json!(1199.6)).unwrap(), 1200);
        assert!(parse_extent(&json!(-3)).is_err());
        assert!(parse_extent(&json!("tall")).is_err());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé…");
        assert_eq!(truncate("short", 10), "short");
    }
}
