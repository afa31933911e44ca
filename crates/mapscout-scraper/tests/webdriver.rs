//! Integration tests for `WebDriverSession` against a mocked WebDriver endpoint.
//!
//! Each test stands up a `wiremock` server that answers the W3C WebDriver
//! commands the session issues, so no real browser or driver is needed.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mapscout_core::BrowserSettings;
use mapscout_scraper::{
    Browser, BrowserError, ElementHandle, Locator, ScrollTarget, WebDriverSession,
};

const SESSION: &str = "5f1c-session";
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

fn settings(server: &MockServer) -> BrowserSettings {
    BrowserSettings {
        webdriver_url: format!("{}/", server.uri()),
        command_timeout_secs: 5,
        headless: true,
        user_agent: "mapscout-test/0.1".to_owned(),
        language: "en-US".to_owned(),
    }
}

async fn mount_new_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/session"))
        .and(body_partial_json(json!({
            "capabilities": { "alwaysMatch": { "browserName": "firefox" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": { "sessionId": SESSION, "capabilities": {} }
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn started(server: &MockServer) -> WebDriverSession {
    mount_new_session(server).await;
    WebDriverSession::start(&settings(server))
        .await
        .expect("session should start")
}

fn session_path(endpoint: &str) -> String {
    format!("/session/{SESSION}/{endpoint}")
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_reads_session_id() {
    let server = MockServer::start().await;
    let session = started(&server).await;
    assert_eq!(session.session_id(), SESSION);
}

#[tokio::test]
async fn start_surfaces_driver_refusal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "value": {
                "error": "session not created",
                "message": "Expected browser binary location",
                "stacktrace": ""
            }
        })))
        .mount(&server)
        .await;

    let result = WebDriverSession::start(&settings(&server)).await;
    match result {
        Err(BrowserError::WebDriver {
            status,
            error,
            message,
        }) => {
            assert_eq!(status, 500);
            assert_eq!(error, "session not created");
            assert!(message.contains("browser binary"));
        }
        Err(other) => panic!("expected WebDriver error, got: {other:?}"),
        Ok(session) => panic!("expected an error, got session {}", session.session_id()),
    }
}

#[tokio::test]
async fn quit_deletes_the_session() {
    let server = MockServer::start().await;
    let session = started(&server).await;
    Mock::given(method("DELETE"))
        .and(path(format!("/session/{SESSION}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .expect(1)
        .mount(&server)
        .await;

    session.quit().await.expect("quit should succeed");
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[tokio::test]
async fn navigate_posts_the_url() {
    let server = MockServer::start().await;
    let session = started(&server).await;
    Mock::given(method("POST"))
        .and(path(session_path("url")))
        .and(body_partial_json(json!({ "url": "https://maps.test/search/cafes" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .expect(1)
        .mount(&server)
        .await;

    session
        .navigate("https://maps.test/search/cafes")
        .await
        .expect("navigate should succeed");
}

#[tokio::test]
async fn page_source_returns_the_document() {
    let server = MockServer::start().await;
    let session = started(&server).await;
    Mock::given(method("GET"))
        .and(path(session_path("source")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "value": "<html><body>ok</body></html>" })),
        )
        .mount(&server)
        .await;

    let html = session.page_source().await.unwrap();
    assert_eq!(html, "<html><body>ok</body></html>");
}

#[tokio::test]
async fn find_all_uses_the_locator_strategy() {
    let server = MockServer::start().await;
    let session = started(&server).await;
    Mock::given(method("POST"))
        .and(path(session_path("elements")))
        .and(body_partial_json(json!({ "using": "css selector", "value": "a.hfpxzc" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [ { ELEMENT_KEY: "el-1" }, { ELEMENT_KEY: "el-2" } ]
        })))
        .mount(&server)
        .await;

    let found = session.find_all(&Locator::css("a.hfpxzc")).await.unwrap();
    assert_eq!(
        found,
        vec![
            ElementHandle("el-1".to_owned()),
            ElementHandle("el-2".to_owned())
        ]
    );
}

#[tokio::test]
async fn wait_for_times_out_when_nothing_matches() {
    let server = MockServer::start().await;
    let session = started(&server).await;
    Mock::given(method("POST"))
        .and(path(session_path("elements")))
        .and(body_partial_json(json!({ "using": "xpath" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .mount(&server)
        .await;

    let result = session
        .wait_for(&Locator::xpath("//div[@role='feed']"), Duration::from_millis(50))
        .await;
    assert!(
        matches!(result, Err(BrowserError::Timeout { .. })),
        "expected Timeout, got: {result:?}"
    );
}

#[tokio::test]
async fn scroll_extent_targets_the_element() {
    let server = MockServer::start().await;
    let session = started(&server).await;
    Mock::given(method("POST"))
        .and(path(session_path("execute/sync")))
        .and(body_partial_json(json!({ "args": [ { ELEMENT_KEY: "sidebar" } ] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": 4812 })))
        .mount(&server)
        .await;

    let target = ScrollTarget::Element(ElementHandle("sidebar".to_owned()));
    assert_eq!(session.scroll_extent(&target).await.unwrap(), 4812);
}

#[tokio::test]
async fn scroll_document_executes_script() {
    let server = MockServer::start().await;
    let session = started(&server).await;
    Mock::given(method("POST"))
        .and(path(session_path("execute/sync")))
        .and(body_partial_json(json!({
            "script": "window.scrollTo(0, document.body.scrollHeight);"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .expect(1)
        .mount(&server)
        .await;

    session.scroll_to_end(&ScrollTarget::Document).await.unwrap();
}

#[tokio::test]
async fn stale_element_maps_to_webdriver_error() {
    let server = MockServer::start().await;
    let session = started(&server).await;
    Mock::given(method("POST"))
        .and(path(session_path("execute/sync")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "value": {
                "error": "stale element reference",
                "message": "element is not attached to the page document"
            }
        })))
        .mount(&server)
        .await;

    let target = ScrollTarget::Element(ElementHandle("gone".to_owned()));
    let result = session.scroll_to_end(&target).await;
    assert!(
        matches!(
            &result,
            Err(BrowserError::WebDriver { status: 404, error, .. }) if error == "stale element reference"
        ),
        "expected stale element error, got: {result:?}"
    );
}

#[tokio::test]
async fn screenshot_is_decoded_from_base64() {
    let server = MockServer::start().await;
    let session = started(&server).await;
    // "\x89PNG" base64-encoded.
    Mock::given(method("GET"))
        .and(path(session_path("screenshot")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": "iVBORw==" })))
        .mount(&server)
        .await;

    let png = session.screenshot_png().await.unwrap();
    assert_eq!(png, vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn non_json_reply_is_unexpected_response() {
    let server = MockServer::start().await;
    let session = started(&server).await;
    Mock::given(method("GET"))
        .and(path(session_path("title")))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let result = session.title().await;
    assert!(
        matches!(result, Err(BrowserError::UnexpectedResponse { .. })),
        "expected UnexpectedResponse, got: {result:?}"
    );
}
