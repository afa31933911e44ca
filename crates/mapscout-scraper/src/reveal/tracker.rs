//! Stop rule for progressive result loading.
//!
//! A scroll is judged by what it changed. When neither the scrollable extent
//! nor the anchor count moved, loading has stalled: that ends the scan unless
//! the list is still short and the scan is still young, in which case the
//! stall is treated as premature and retried. Scrolls that changed something
//! count toward the attempt ceiling.

use mapscout_core::RunConfig;

/// One `(extent, count)` measurement taken after a scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Observation {
    pub extent: u64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Extent and count stopped changing.
    Stable,
    /// The attempt ceiling was reached while results were still arriving.
    AttemptLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Scanning,
    /// The last scroll stalled early; wait again before the next one.
    StabilizingRetry,
    Done(StopReason),
}

impl RevealPhase {
    #[must_use]
    pub fn is_done(self) -> bool {
        matches!(self, Self::Done(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityPolicy {
    pub max_attempts: u32,
    pub stall_count_floor: usize,
    pub stall_attempt_window: u32,
    pub stall_retry_limit: u32,
}

impl From<&RunConfig> for StabilityPolicy {
    fn from(config: &RunConfig) -> Self {
        Self {
            max_attempts: config.max_scroll_attempts,
            stall_count_floor: config.stall_count_floor,
            stall_attempt_window: config.stall_attempt_window,
            stall_retry_limit: config.stall_retry_limit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StabilityTracker {
    policy: StabilityPolicy,
    last: Observation,
    phase: RevealPhase,
    scrolls: u32,
    attempts: u32,
    stall_retries: u32,
}

impl StabilityTracker {
    /// Starts tracking from the observation taken before the first scroll.
    #[must_use]
    pub fn new(policy: StabilityPolicy, initial: Observation) -> Self {
        let phase = if policy.max_attempts == 0 {
            RevealPhase::Done(StopReason::AttemptLimit)
        } else {
            RevealPhase::Scanning
        };
        Self {
            policy,
            last: initial,
            phase,
            scrolls: 0,
            attempts: 0,
            stall_retries: 0,
        }
    }

    /// Feeds the observation taken after one scroll and returns the new phase.
    ///
    /// Once `Done`, further observations are ignored.
    pub fn observe(&mut self, obs: Observation) -> RevealPhase {
        if self.phase.is_done() {
            return self.phase;
        }
        self.scrolls += 1;

        self.phase = if obs == self.last {
            let premature = obs.count < self.policy.stall_count_floor
                && self.attempts < self.policy.stall_attempt_window
                && self.stall_retries < self.policy.stall_retry_limit;
            if premature {
                self.stall_retries += 1;
                RevealPhase::StabilizingRetry
            } else {
                RevealPhase::Done(StopReason::Stable)
            }
        } else {
            self.last = obs;
            self.attempts += 1;
            if self.attempts >= self.policy.max_attempts {
                RevealPhase::Done(StopReason::AttemptLimit)
            } else {
                RevealPhase::Scanning
            }
        };
        self.phase
    }

    #[must_use]
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Every scroll issued so far, retries included.
    #[must_use]
    pub fn scrolls(&self) -> u32 {
        self.scrolls
    }

    /// Scrolls that changed the observation.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn stall_retries(&self) -> u32 {
        self.stall_retries
    }

    #[must_use]
    pub fn last(&self) -> Observation {
        self.last
    }
}
