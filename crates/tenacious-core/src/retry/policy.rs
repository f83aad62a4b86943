use super::classify::classify;
use super::error::NetworkError;
use crate::request::ExecutionRequest;
use std::time::Duration;

/// Decision returned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Attempt counter owned by exactly one in-flight execution.
///
/// 1-based: the first physical call is attempt 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptState {
    current: u32,
}

impl Default for AttemptState {
    fn default() -> Self {
        Self { current: 1 }
    }
}

impl AttemptState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u32 {
        self.current
    }
}

/// Next step after one attempt's outcome has been classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Succeeded(Vec<u8>),
    /// Re-issue as attempt `attempt` after `backoff`. `cause` is for logging.
    Retry {
        attempt: u32,
        backoff: Duration,
        cause: NetworkError,
    },
    FailedPermanently(NetworkError),
    /// Budget spent. `last` is for logging only; callers see `NetworkError::Exhausted`.
    Exhausted { last: NetworkError },
}

impl Transition {
    /// True when the execution has ended.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Transition::Retry { .. })
    }
}

/// Fixed-interval retry policy bounded by total physical attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Wait between retryable attempts; zero retries immediately.
    pub retry_interval: Duration,
}

impl RetryPolicy {
    pub fn for_request(request: &ExecutionRequest) -> Self {
        Self {
            max_attempts: request.max_attempts(),
            retry_interval: request.retry_interval(),
        }
    }

    /// Advance `state` given the outcome of attempt `state.current()`.
    pub fn advance(
        &self,
        state: &mut AttemptState,
        outcome: Result<Vec<u8>, NetworkError>,
    ) -> Transition {
        let err = match outcome {
            Ok(body) => return Transition::Succeeded(body),
            Err(err) => err,
        };

        match classify(&err, self.retry_interval) {
            RetryDecision::NoRetry => Transition::FailedPermanently(err),
            RetryDecision::RetryAfter(_) if state.current >= self.max_attempts => {
                Transition::Exhausted { last: err }
            }
            RetryDecision::RetryAfter(backoff) => {
                state.current += 1;
                Transition::Retry {
                    attempt: state.current,
                    backoff,
                    cause: err,
                }
            }
        }
    }
}
