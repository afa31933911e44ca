//! `--check-browser`: prove the WebDriver setup works before a real run.

use std::path::Path;

use mapscout_core::AppConfig;
use mapscout_scraper::{Browser, WebDriverSession};

pub(crate) async fn run_browser_check(
    config: &AppConfig,
    url: &str,
    screenshot: &Path,
) -> anyhow::Result<()> {
    let session = WebDriverSession::start(&config.browser).await.map_err(|e| {
        anyhow::anyhow!(
            "failed to start browser session at {}: {e}",
            config.browser.webdriver_url
        )
    })?;

    let result = capture(&session, url, screenshot).await;

    if let Err(e) = session.quit().await {
        tracing::warn!(error = %e, "failed to release browser session");
    }
    result
}

async fn capture(session: &WebDriverSession, url: &str, screenshot: &Path) -> anyhow::Result<()> {
    session.navigate(url).await?;
    let title = session.title().await?;
    tracing::info!(url, title = %title, "page loaded");

    let png = session.screenshot_png().await?;
    tokio::fs::write(screenshot, &png).await.map_err(|e| {
        anyhow::anyhow!("failed to save screenshot to {}: {e}", screenshot.display())
    })?;

    println!(
        "Browser check passed: \"{title}\" (screenshot saved to {})",
        screenshot.display()
    );
    Ok(())
}
