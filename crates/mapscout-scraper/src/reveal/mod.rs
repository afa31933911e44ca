//! Incremental result revealing: scroll the result list until it stops growing.

mod tracker;

use mapscout_core::RunConfig;

use crate::browser::{Browser, Locator, ScrollTarget};
use crate::error::BrowserError;
use crate::selectors::CompiledProfile;

pub use tracker::{Observation, RevealPhase, StabilityPolicy, StabilityTracker, StopReason};

/// What was scrolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealTarget {
    Sidebar,
    /// The sidebar could not be located in time; the whole document was used.
    Document,
}

/// How one reveal pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealOutcome {
    pub target: RevealTarget,
    /// `false` when no result anchor appeared within the results timeout.
    /// Nothing was scrolled in that case.
    pub results_visible: bool,
    pub scrolls: u32,
    pub productive_scrolls: u32,
    pub stall_retries: u32,
    /// Anchor count at the last observation.
    pub last_count: usize,
    /// `None` when scrolling never started.
    pub stop: Option<StopReason>,
}

impl RevealOutcome {
    fn not_visible() -> Self {
        Self {
            target: RevealTarget::Document,
            results_visible: false,
            scrolls: 0,
            productive_scrolls: 0,
            stall_retries: 0,
            last_count: 0,
            stop: None,
        }
    }
}

/// Scrolls the result list until [`StabilityTracker`] says no more results
/// will load.
///
/// Load timeouts are not errors: a missing results marker yields an outcome
/// with `results_visible == false`, and a missing sidebar falls back to
/// scrolling the document.
///
/// # Errors
///
/// Propagates browser failures other than those two timeouts.
pub async fn reveal<B>(
    browser: &B,
    profile: &CompiledProfile,
    config: &RunConfig,
) -> Result<RevealOutcome, BrowserError>
where
    B: Browser + ?Sized,
{
    let anchors = profile.results_anchor_locator();

    match browser.wait_for(&anchors, config.results_timeout).await {
        Ok(_) => {}
        Err(BrowserError::Timeout { what, waited_ms }) => {
            tracing::warn!(
                marker = %what,
                waited_ms,
                "no results visible — continuing with whatever is rendered"
            );
            return Ok(RevealOutcome::not_visible());
        }
        Err(e) => return Err(e),
    }

    let (target, kind) = match browser
        .wait_for(profile.results_sidebar_locator(), config.sidebar_timeout)
        .await
    {
        Ok(sidebar) => (ScrollTarget::Element(sidebar), RevealTarget::Sidebar),
        Err(BrowserError::Timeout { what, waited_ms }) => {
            tracing::warn!(
                sidebar = %what,
                waited_ms,
                "results sidebar not found — scrolling the whole document"
            );
            (ScrollTarget::Document, RevealTarget::Document)
        }
        Err(e) => return Err(e),
    };

    let initial = observe(browser, &target, &anchors).await?;
    tracing::debug!(
        extent = initial.extent,
        count = initial.count,
        "initial result list"
    );

    let mut tracker = StabilityTracker::new(StabilityPolicy::from(config), initial);
    while !tracker.phase().is_done() {
        if tracker.phase() == RevealPhase::StabilizingRetry {
            tracing::debug!(
                count = tracker.last().count,
                "result list stalled early — waiting before retrying"
            );
            tokio::time::sleep(config.poll_delay).await;
        }

        browser.scroll_to_end(&target).await?;
        tokio::time::sleep(config.poll_delay).await;
        let obs = observe(browser, &target, &anchors).await?;
        let phase = tracker.observe(obs);

        tracing::info!(
            scroll = tracker.scrolls(),
            attempt = tracker.attempts(),
            max_scroll_attempts = config.max_scroll_attempts,
            count = obs.count,
            extent = obs.extent,
            ?phase,
            "scrolled result list"
        );
    }

    let stop = match tracker.phase() {
        RevealPhase::Done(reason) => Some(reason),
        RevealPhase::Scanning | RevealPhase::StabilizingRetry => None,
    };
    let outcome = RevealOutcome {
        target: kind,
        results_visible: true,
        scrolls: tracker.scrolls(),
        productive_scrolls: tracker.attempts(),
        stall_retries: tracker.stall_retries(),
        last_count: tracker.last().count,
        stop,
    };
    tracing::info!(
        scrolls = outcome.scrolls,
        count = outcome.last_count,
        stop = ?outcome.stop,
        "result list revealed"
    );
    Ok(outcome)
}

async fn observe<B>(
    browser: &B,
    target: &ScrollTarget,
    anchors: &Locator,
) -> Result<Observation, BrowserError>
where
    B: Browser + ?Sized,
{
    let extent = browser.scroll_extent(target).await?;
    let count = browser.find_all(anchors).await?.len();
    Ok(Observation { extent, count })
}
