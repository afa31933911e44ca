use std::time::Duration;

use crate::app_config::AppConfig;

/// Results below this count make an early stall look premature.
pub const STALL_COUNT_FLOOR: usize = 10;
/// Stalls observed before this many productive scrolls get an extra retry.
pub const STALL_ATTEMPT_WINDOW: u32 = 5;

/// Read-only knobs for one discovery run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Upper bound on result handles visited.
    pub max_results: usize,
    /// Pause after each scroll and each detail navigation.
    pub poll_delay: Duration,
    /// Ceiling on scrolls that changed the `(extent, count)` observation.
    pub max_scroll_attempts: u32,
    /// Ceiling on premature-stall retries, so a genuinely short result list
    /// still terminates.
    pub stall_retry_limit: u32,
    pub stall_count_floor: usize,
    pub stall_attempt_window: u32,
    /// Bounded wait for the first result anchor to render.
    pub results_timeout: Duration,
    /// Bounded wait for the scrollable results sidebar.
    pub sidebar_timeout: Duration,
}

impl RunConfig {
    /// Combines per-invocation arguments with the environment-derived limits.
    #[must_use]
    pub fn from_app_config(config: &AppConfig, max_results: usize, poll_delay: Duration) -> Self {
        Self {
            max_results,
            poll_delay,
            max_scroll_attempts: config.max_scroll_attempts,
            stall_retry_limit: config.stall_retry_limit,
            stall_count_floor: STALL_COUNT_FLOOR,
            stall_attempt_window: STALL_ATTEMPT_WINDOW,
            results_timeout: Duration::from_secs(config.results_timeout_secs),
            sidebar_timeout: Duration::from_secs(config.sidebar_timeout_secs),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_results: 50,
            poll_delay: Duration::from_secs(5),
            max_scroll_attempts: 40,
            stall_retry_limit: 5,
            stall_count_floor: STALL_COUNT_FLOOR,
            stall_attempt_window: STALL_ATTEMPT_WINDOW,
            results_timeout: Duration::from_secs(30),
            sidebar_timeout: Duration::from_secs(30),
        }
    }
}
