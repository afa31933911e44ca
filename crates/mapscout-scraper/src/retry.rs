//! Retry with exponential back-off and jitter for geocoder lookups.
//!
//! Public geocoders throttle aggressively, so 429s and transient transport
//! failures are retried a few times before the resolver gives up and falls
//! back to the default location.

use std::future::Future;
use std::time::Duration;

use crate::error::GeocodeError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - [`GeocodeError::RateLimited`] (HTTP 429).
/// - [`GeocodeError::UnexpectedStatus`] with a 5xx status.
/// - [`GeocodeError::Http`] timeouts and connection failures.
///
/// Everything else (empty result sets, malformed bodies, bad URLs) is returned
/// immediately; asking again will not change the answer.
pub(crate) fn is_retriable(err: &GeocodeError) -> bool {
    match err {
        GeocodeError::RateLimited { .. } => true,
        GeocodeError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        GeocodeError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        GeocodeError::InvalidBaseUrl { .. }
        | GeocodeError::Deserialize { .. }
        | GeocodeError::NoResults { .. }
        | GeocodeError::MalformedCoordinate { .. } => false,
    }
}

/// Longest pause between two geocoder attempts, `Retry-After` included.
const MAX_DELAY_MS: u64 = 30_000;

/// Pause before retry number `attempt` (1-based).
///
/// Exponential `backoff_base_ms * 2^(attempt-1)` with ±25 % jitter, never
/// shorter than a 429's `Retry-After`, and capped at [`MAX_DELAY_MS`].
pub(crate) fn backoff_delay(attempt: u32, backoff_base_ms: u64, err: &GeocodeError) -> Duration {
    let exponential = backoff_base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (exponential.min(MAX_DELAY_MS) as f64 * (rand::random::<f64>() * 0.5 + 0.75))
        as u64;
    let floor_ms = match err {
        GeocodeError::RateLimited { retry_after_secs } => retry_after_secs.saturating_mul(1000),
        _ => 0,
    };
    Duration::from_millis(jittered.max(floor_ms).min(MAX_DELAY_MS))
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors,
/// sleeping [`backoff_delay`] between them.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, GeocodeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GeocodeError>>,
{
    let mut retries = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if is_retriable(&err) && retries < max_retries => err,
            Err(err) => return Err(err),
        };
        retries += 1;
        let delay = backoff_delay(retries, backoff_base_ms, &err);
        tracing::warn!(
            retry = retries,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "geocoder lookup failed, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}
