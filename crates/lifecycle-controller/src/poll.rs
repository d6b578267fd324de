//! Bounded polling

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Reached,
    TimedOut,
    Cancelled,
}

/// Sleeps `interval`, then runs `check`, until it returns true or `timeout`
/// has elapsed.
///
/// The last sleep is clipped so the final check lands on the deadline. The
/// wait is abandoned as soon as `cancel` fires.
pub async fn poll_until<F, Fut>(
    interval: Duration,
    timeout: Duration,
    cancel: &CancellationToken,
    mut check: F,
) -> PollOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + timeout;
    loop {
        let now = Instant::now();
        if now >= deadline {
            return PollOutcome::TimedOut;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return PollOutcome::Cancelled,
            _ = tokio::time::sleep(interval.min(deadline - now)) => {}
        }

        if check().await {
            return PollOutcome::Reached;
        }
    }
}
