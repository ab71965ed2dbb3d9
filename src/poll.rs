//! Result polling.
//!
//! Two policies share one fetch primitive:
//!
//! * [`PollEngine::fetch_until_final`] retries up to a fixed number of attempts
//!   and, when attempts run out while the job is still pending, returns that
//!   partial result as a success.
//! * [`PollEngine::watch`] polls against a time budget, reports its single
//!   terminal outcome through an [`EventRegistry`], and treats running out of
//!   time as a `Timeout` error.
//!
//! Both are written as explicit state machines whose only non-terminal state
//! is the pending one; each loop turn is that state's transition function.

use crate::config::{DEFAULT_MAX_ATTEMPTS, DEFAULT_POLLING_INTERVAL_MS, DEFAULT_POLL_TIMEOUT_MS};
use crate::error::{Error, Result};
use crate::events::{EventRegistry, PollEvent};
use crate::formatter::ResultFormatter;
use crate::models::{DetectionResult, MediaResponse};
use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;
use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// Source of raw media status payloads.
///
/// Implementations must report a missing job as [`Error::NotFound`].
#[async_trait]
pub trait ResultFetcher: Send + Sync {
    /// Fetch the current status payload for `request_id`
    async fn fetch_status(&self, request_id: &str) -> Result<MediaResponse>;
}

/// Cooperative cancellation: an optional token and an optional deadline.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CancelSignal {
    /// Build a signal from a caller token and a wall-clock cutoff
    pub fn new(token: Option<CancellationToken>, deadline: Option<std::time::Instant>) -> Self {
        Self {
            token: token.unwrap_or_default(),
            deadline: deadline.map(Instant::from_std),
        }
    }

    /// A signal that never fires
    pub fn never() -> Self {
        Self::default()
    }

    /// Whether the token was cancelled or the deadline has passed
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolves once the signal fires
    pub async fn cancelled(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }

    /// Sleep for `duration` unless the signal fires first
    pub async fn sleep(&self, duration: Duration) -> Result<()> {
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(Error::Cancelled),
            _ = sleep(duration) => Ok(()),
        }
    }
}

/// Limits for [`PollEngine::fetch_until_final`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptPolicy {
    /// Number of fetches before giving up
    pub max_attempts: u32,
    /// Wait between fetches
    pub polling_interval: Duration,
}

impl AttemptPolicy {
    /// Apply defaults to missing or zero values
    pub fn from_options(max_attempts: Option<u32>, polling_interval_ms: Option<u64>) -> Self {
        Self {
            max_attempts: max_attempts
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
            polling_interval: Duration::from_millis(
                polling_interval_ms
                    .filter(|ms| *ms > 0)
                    .unwrap_or(DEFAULT_POLLING_INTERVAL_MS),
            ),
        }
    }
}

impl Default for AttemptPolicy {
    fn default() -> Self {
        Self::from_options(None, None)
    }
}

/// Limits for [`PollEngine::watch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchPolicy {
    /// Wait between fetches
    pub polling_interval: Duration,
    /// Total budget, counted in polling intervals. Zero means already expired.
    pub timeout: Duration,
}

impl WatchPolicy {
    /// Apply defaults: a missing or zero interval and a missing timeout use the
    /// defaults, while an explicit zero timeout is kept.
    pub fn from_options(polling_interval_ms: Option<u64>, timeout_ms: Option<u64>) -> Self {
        Self {
            polling_interval: Duration::from_millis(
                polling_interval_ms
                    .filter(|ms| *ms > 0)
                    .unwrap_or(DEFAULT_POLLING_INTERVAL_MS),
            ),
            timeout: Duration::from_millis(timeout_ms.unwrap_or(DEFAULT_POLL_TIMEOUT_MS)),
        }
    }
}

impl Default for WatchPolicy {
    fn default() -> Self {
        Self::from_options(None, None)
    }
}

#[derive(Debug)]
enum FetchState {
    Pending { attempt: u32 },
    Delivered(DetectionResult),
    Failed(Error),
    TimedOut,
    Cancelled,
}

#[derive(Debug)]
enum WatchState {
    Polling { elapsed: Duration },
    Delivered(DetectionResult),
    Failed(Error),
    TimedOut,
    Cancelled,
}

/// Drives repeated status fetches for one request id
pub struct PollEngine<'a> {
    fetcher: &'a dyn ResultFetcher,
    formatter: &'a ResultFormatter,
    signal: CancelSignal,
}

impl<'a> PollEngine<'a> {
    /// Create an engine over `fetcher`, formatting with `formatter`
    pub fn new(
        fetcher: &'a dyn ResultFetcher,
        formatter: &'a ResultFormatter,
        signal: CancelSignal,
    ) -> Self {
        Self {
            fetcher,
            formatter,
            signal,
        }
    }

    /// Fetch and format once. Cancellation aborts an in-flight fetch.
    pub async fn fetch_once(&self, request_id: &str) -> Result<DetectionResult> {
        let response = tokio::select! {
            biased;
            _ = self.signal.cancelled() => return Err(Error::Cancelled),
            response = self.fetcher.fetch_status(request_id) => response?,
        };
        Ok(self.formatter.format(&response))
    }

    /// Fetch until the result is final or `policy.max_attempts` fetches were made.
    ///
    /// `NotFound` responses are retried. Running out of attempts while the job is
    /// still pending returns that pending result; running out on a `NotFound`
    /// returns [`Error::Timeout`].
    pub async fn fetch_until_final(
        &self,
        request_id: &str,
        policy: AttemptPolicy,
    ) -> Result<DetectionResult> {
        let mut state = FetchState::Pending { attempt: 0 };

        loop {
            state = match state {
                FetchState::Pending { attempt } => {
                    self.advance_fetch(request_id, &policy, attempt).await
                }
                FetchState::Delivered(result) => {
                    debug!("request {} resolved with status {}", request_id, result.status);
                    return Ok(result);
                }
                FetchState::Failed(err) => return Err(err),
                FetchState::TimedOut => {
                    return Err(Error::Timeout(format!(
                        "exceeded maximum number of polling attempts ({})",
                        policy.max_attempts
                    )))
                }
                FetchState::Cancelled => return Err(Error::Cancelled),
            };
        }
    }

    async fn advance_fetch(
        &self,
        request_id: &str,
        policy: &AttemptPolicy,
        attempt: u32,
    ) -> FetchState {
        if self.signal.is_cancelled() {
            return FetchState::Cancelled;
        }

        let attempt = attempt + 1;
        debug!(
            "fetching result for {} (attempt {}/{})",
            request_id, attempt, policy.max_attempts
        );

        match self.fetch_once(request_id).await {
            Ok(result) if result.is_still_pending() => {
                if attempt >= policy.max_attempts {
                    debug!(
                        "attempts exhausted for {}, returning pending result",
                        request_id
                    );
                    return FetchState::Delivered(result);
                }
                self.pause(policy.polling_interval, FetchState::Pending { attempt })
                    .await
            }
            Ok(result) => FetchState::Delivered(result),
            Err(Error::Cancelled) => FetchState::Cancelled,
            Err(err) if err.is_not_found() => {
                if attempt >= policy.max_attempts {
                    warn!("request {} still not found after {} attempts", request_id, attempt);
                    return FetchState::TimedOut;
                }
                debug!("request {} not found yet, retrying", request_id);
                self.pause(policy.polling_interval, FetchState::Pending { attempt })
                    .await
            }
            Err(err) => FetchState::Failed(err),
        }
    }

    async fn pause(&self, interval: Duration, next: FetchState) -> FetchState {
        match self.signal.sleep(interval).await {
            Ok(()) => next,
            Err(_) => FetchState::Cancelled,
        }
    }

    /// Poll until a final status, an error, the time budget, or cancellation.
    ///
    /// Emits exactly one `result` or `error` event, except on cancellation,
    /// which emits nothing. Only an overall `ANALYZING` status keeps polling,
    /// and `NotFound` is a terminal error here.
    pub async fn watch(
        &self,
        request_id: &str,
        policy: WatchPolicy,
        events: &EventRegistry,
    ) -> Result<()> {
        let mut state = WatchState::Polling {
            elapsed: Duration::ZERO,
        };

        loop {
            state = match state {
                WatchState::Polling { elapsed } => {
                    self.advance_watch(request_id, &policy, elapsed).await
                }
                WatchState::Delivered(result) => {
                    events.dispatch(PollEvent::Result(&result));
                    return Ok(());
                }
                WatchState::Failed(err) => {
                    warn!("polling {} failed: {}", request_id, err);
                    events.dispatch(PollEvent::Error(&err));
                    return Err(err);
                }
                WatchState::TimedOut => {
                    let err = Error::Timeout("Polling timeout exceeded".to_string());
                    warn!("polling {} timed out after {:?}", request_id, policy.timeout);
                    events.dispatch(PollEvent::Error(&err));
                    return Err(err);
                }
                WatchState::Cancelled => {
                    debug!("polling {} cancelled", request_id);
                    return Err(Error::Cancelled);
                }
            };
        }
    }

    async fn advance_watch(
        &self,
        request_id: &str,
        policy: &WatchPolicy,
        elapsed: Duration,
    ) -> WatchState {
        // Cancellation wins over an expired budget; a zero budget never fetches
        if self.signal.is_cancelled() {
            return WatchState::Cancelled;
        }
        if elapsed >= policy.timeout {
            return WatchState::TimedOut;
        }

        match self.fetch_once(request_id).await {
            Ok(result) if result.is_analyzing() => {
                let elapsed = elapsed + policy.polling_interval;
                match self.signal.sleep(policy.polling_interval).await {
                    Ok(()) => WatchState::Polling { elapsed },
                    Err(_) => WatchState::Cancelled,
                }
            }
            Ok(result) => WatchState::Delivered(result),
            Err(Error::Cancelled) => WatchState::Cancelled,
            Err(err) => WatchState::Failed(err),
        }
    }
}
