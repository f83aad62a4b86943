//! Decide whether a classified error is transient and how long to wait.

use super::error::NetworkError;
use super::policy::RetryDecision;
use std::time::Duration;

/// Endpoint statuses treated as temporary service unavailability.
pub const RETRYABLE_STATUSES: [u16; 5] = [408, 444, 503, 504, 599];

/// True if an HTTP status is in the retryable subset.
pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

/// True if the error is transient and the request may be re-issued.
pub fn should_retry(err: &NetworkError) -> bool {
    match err {
        NetworkError::Transport(e) => e.kind.is_transient(),
        NetworkError::EndpointError { status, .. } => is_retryable_status(*status),
        NetworkError::GeneralTransportFailure(_)
        | NetworkError::NoResponse
        | NetworkError::InvalidResponseType(_)
        | NetworkError::NoResponseData { .. }
        | NetworkError::Exhausted
        | NetworkError::Cancelled => false,
    }
}

/// Classify an error into a retry decision with a flat backoff.
///
/// The interval does not grow with the attempt number.
pub fn classify(err: &NetworkError, retry_interval: Duration) -> RetryDecision {
    if should_retry(err) {
        RetryDecision::RetryAfter(retry_interval)
    } else {
        RetryDecision::NoRetry
    }
}
