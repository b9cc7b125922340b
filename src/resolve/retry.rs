//! resolve::retry
//!
//! Bounded retry with delay.
//!
//! One combinator serves every polling site in the pipeline: waiting for
//! remotes to populate and re-running the remote branch listing. Delays are
//! `tokio::time::sleep`, so an abandoned retry loop simply stops being
//! polled and tests can drive it on a paused clock.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use ghlink::resolve::retry::{retry, RetryPolicy};
//!
//! # tokio_test::block_on(async {
//! let policy = RetryPolicy::fixed(3, Duration::from_millis(1));
//! let result: Result<u32, &str> = retry(&policy, |attempt| async move {
//!     if attempt < 3 { Err("not yet") } else { Ok(attempt) }
//! }, |_| true).await;
//! assert_eq!(result, Ok(3));
//! # });
//! ```

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// How the delay grows between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// Same delay every time
    #[default]
    Fixed,
    /// Delay doubles after each attempt
    Exponential,
}

/// Retry limits for one call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (at least one is always made)
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub delay: Duration,
    /// Growth of the delay for later attempts
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// A policy with a constant delay between attempts.
    pub const fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            backoff: Backoff::Fixed,
        }
    }

    /// Switch to exponential backoff.
    pub const fn exponential(self) -> Self {
        Self {
            backoff: Backoff::Exponential,
            ..self
        }
    }

    /// Delay to wait after the given (one-based) failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential => {
                let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
                self.delay.saturating_mul(factor)
            }
        }
    }
}

/// Run `op` until it succeeds, fails fatally, or attempts run out.
///
/// `op` receives the one-based attempt number. An error for which
/// `is_retryable` returns `false` is returned immediately; otherwise the
/// last error is returned once `max_attempts` have been made. There is no
/// delay after the final attempt.
pub async fn retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut op: F,
    is_retryable: impl Fn(&E) -> bool,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= max_attempts || !is_retryable(&err) => return Err(err),
            Err(_) => {
                let delay = policy.delay_after(attempt);
                debug!(attempt, max_attempts, delay_ms = delay.as_millis() as u64, "retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn exhausts_attempts_with_fixed_delay() {
        let calls = Cell::new(0);
        let start = Instant::now();

        let result: Result<(), &str> = retry(
            &RetryPolicy::fixed(10, Duration::from_millis(500)),
            |_| {
                calls.set(calls.get() + 1);
                async { Err("empty") }
            },
            |_| true,
        )
        .await;

        assert_eq!(result, Err("empty"));
        assert_eq!(calls.get(), 10);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(4500));
        assert!(elapsed < Duration::from_millis(5000));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_without_waiting_on_first_try() {
        let start = Instant::now();
        let result: Result<u32, &str> = retry(
            &RetryPolicy::fixed(3, Duration::from_millis(500)),
            |attempt| async move { Ok(attempt) },
            |_| true,
        )
        .await;

        assert_eq!(result, Ok(1));
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_error_stops_immediately() {
        let calls = Cell::new(0);
        let result: Result<(), &str> = retry(
            &RetryPolicy::fixed(5, Duration::from_millis(500)),
            |_| {
                calls.set(calls.get() + 1);
                async { Err("fatal") }
            },
            |err| *err != "fatal",
        )
        .await;

        assert_eq!(result, Err("fatal"));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_runs_once() {
        let calls = Cell::new(0);
        let _: Result<(), &str> = retry(
            &RetryPolicy::fixed(0, Duration::from_millis(500)),
            |_| {
                calls.set(calls.get() + 1);
                async { Err("x") }
            },
            |_| true,
        )
        .await;
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn exponential_delay_doubles() {
        let policy = RetryPolicy::fixed(4, Duration::from_millis(100)).exponential();
        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2), Duration::from_millis(200));
        assert_eq!(policy.delay_after(3), Duration::from_millis(400));
    }
}
