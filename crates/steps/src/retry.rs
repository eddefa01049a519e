//! Bounded retry for flaky browser probes
//!
//! Every step that reads rendered page state goes through [`run_with_timeout`].
//! The loop is eager: the first attempt runs immediately, and each failure is
//! followed by a wait of `min(poll_interval, time left)` before the next one.
//! An attempt that is already running when the deadline passes is allowed to
//! finish, but no attempt is ever started at or after the deadline.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::error::{StepError, StepResult};

/// Default total budget for a retried step.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4);

/// Reported in place of a failure reason when no attempt ever ran.
pub const NO_ATTEMPT_REASON: &str = "no attempt completed";

/// Timeout and polling interval shared by every retried step of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    timeout: Duration,
    poll_interval: Duration,
}

impl RetryPolicy {
    /// Build a policy. A zero `timeout` is allowed and yields exactly one
    /// attempt; a zero `poll_interval` is rejected.
    pub fn new(timeout: Duration, poll_interval: Duration) -> StepResult<Self> {
        if poll_interval.is_zero() {
            return Err(StepError::Config(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            timeout,
            poll_interval,
        })
    }

    /// Policy polling twenty times over the given budget.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: default_poll_interval(timeout),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }
}

/// `timeout / 20`, never below one millisecond
pub fn default_poll_interval(timeout: Duration) -> Duration {
    (timeout / 20).max(Duration::from_millis(1))
}

/// A successful run: the operation's value and how many attempts it took
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempted<T> {
    pub value: T,
    pub attempts: u32,
}

/// Why the loop gave up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    DeadlineExceeded,
    Cancelled,
}

/// Terminal failure of a retried operation
#[derive(Debug)]
pub struct RetryError<E> {
    pub reason: StopReason,
    pub attempts: u32,
    /// Failure of the most recent attempt; `None` only when no attempt ran.
    pub last_error: Option<E>,
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.reason {
            StopReason::DeadlineExceeded => "exceeded timeout",
            StopReason::Cancelled => "cancelled",
        };
        write!(f, "{}, tried {} times: ", prefix, self.attempts)?;
        match &self.last_error {
            Some(err) => write!(f, "{}", err),
            None => f.write_str(NO_ATTEMPT_REASON),
        }
    }
}

impl<E> StdError for RetryError<E>
where
    E: StdError + 'static,
{
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.last_error.as_ref().map(|err| err as &(dyn StdError + 'static))
    }
}

/// Result of [`run_with_timeout`]
pub type RetryOutcome<T, E> = Result<Attempted<T>, RetryError<E>>;

/// Invoke `operation` until it succeeds or `policy.timeout()` elapses.
pub async fn run_with_timeout<F, Fut, T, E>(
    policy: &RetryPolicy,
    operation: F,
) -> RetryOutcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    run_with_cancellation(policy, &CancellationToken::new(), operation).await
}

/// Same as [`run_with_timeout`], but also stops when `cancel` fires.
///
/// The token is observed on entry and during every wait, never in the middle
/// of an attempt.
pub async fn run_with_cancellation<F, Fut, T, E>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut operation: F,
) -> RetryOutcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    // None when the timeout does not fit in an Instant; the loop then only
    // stops on success or cancellation.
    let deadline = Instant::now().checked_add(policy.timeout);
    let mut attempts: u32 = 0;
    let mut last_error = None;

    let reason = loop {
        if cancel.is_cancelled() {
            break StopReason::Cancelled;
        }

        attempts += 1;
        match operation().await {
            Ok(value) => {
                trace!(attempts, "operation succeeded");
                return Ok(Attempted { value, attempts });
            }
            Err(err) => {
                trace!(attempts, "attempt failed");
                last_error = Some(err);
            }
        }

        let now = Instant::now();
        let wait = match deadline {
            Some(deadline) if now >= deadline => break StopReason::DeadlineExceeded,
            Some(deadline) => policy.poll_interval.min(deadline - now),
            None => policy.poll_interval,
        };

        tokio::select! {
            _ = sleep(wait) => {}
            _ = cancel.cancelled() => break StopReason::Cancelled,
        }

        if matches!(deadline, Some(deadline) if Instant::now() >= deadline) {
            break StopReason::DeadlineExceeded;
        }
    };

    Err(RetryError {
        reason,
        attempts,
        last_error,
    })
}
