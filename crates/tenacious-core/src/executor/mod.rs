//! Request executor: one logical execution across N physical attempts.
//!
//! The loop here is the only place attempts are counted and the only place
//! `NetworkError::Exhausted` is produced. Both caller surfaces, suspending
//! (`execute`, `execute_with_abort`) and callback (`execute_with_callback`),
//! run this same loop.

mod abort;
mod callback;

pub use abort::AbortToken;
pub use callback::ExecutionHandle;

use crate::auth::{Authenticator, NoAuth};
use crate::request::ExecutionRequest;
use crate::retry::{validate, AttemptState, NetworkError, RetryPolicy, Transition};
use crate::transport::Transport;
use std::sync::Arc;

/// Terminal result of one logical execution.
pub type Outcome = Result<Vec<u8>, NetworkError>;

/// Drives a [`Transport`] through the retry policy.
///
/// Cheap to clone; holds no per-execution state, so one executor can serve
/// many concurrent executions.
pub struct RequestExecutor<T, A = NoAuth> {
    transport: Arc<T>,
    authenticator: Arc<A>,
}

impl<T, A> Clone for RequestExecutor<T, A> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}

impl<T: Transport> RequestExecutor<T, NoAuth> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            authenticator: Arc::new(NoAuth),
        }
    }
}

impl<T: Transport, A: Authenticator> RequestExecutor<T, A> {
    /// Replace the authentication hook.
    pub fn with_authenticator<B: Authenticator>(self, authenticator: B) -> RequestExecutor<T, B> {
        RequestExecutor {
            transport: self.transport,
            authenticator: Arc::new(authenticator),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run `request` to a terminal outcome, suspending the caller.
    ///
    /// Dropping the returned future abandons the execution at its current
    /// suspension point.
    pub async fn execute(&self, request: &ExecutionRequest) -> Outcome {
        self.execute_with_abort(request, &AbortToken::new()).await
    }

    /// Like [`execute`](Self::execute), but stops with `NetworkError::Cancelled`
    /// as soon as `abort` fires: during the auth hook, the transport call, or
    /// the backoff wait. No transport call starts after an abort.
    pub async fn execute_with_abort(
        &self,
        request: &ExecutionRequest,
        abort: &AbortToken,
    ) -> Outcome {
        let policy = RetryPolicy::for_request(request);
        let mut state = AttemptState::new();
        let url = request.request().url();

        loop {
            if abort.is_aborted() {
                return Err(cancelled(state.current()));
            }
            let attempt = state.current();
            tracing::debug!(%url, attempt, max_attempts = policy.max_attempts, "sending request");

            let outbound = tokio::select! {
                biased;
                _ = abort.aborted() => return Err(cancelled(attempt)),
                r = self.authenticator.authenticate(request.request().clone(), attempt) => r,
            };
            let exchange = tokio::select! {
                biased;
                _ = abort.aborted() => return Err(cancelled(attempt)),
                ex = self.transport.perform(&outbound) => ex,
            };

            let outcome = validate(exchange, request.allows_empty_body());
            match policy.advance(&mut state, outcome) {
                Transition::Succeeded(body) => {
                    tracing::debug!(%url, attempt, bytes = body.len(), "request succeeded");
                    return Ok(body);
                }
                Transition::FailedPermanently(err) => {
                    tracing::info!(%url, attempt, "request failed, not retrying: {}", err);
                    return Err(err);
                }
                Transition::Exhausted { last } => {
                    tracing::warn!(%url, attempt, "giving up after {} attempts, last error: {}", attempt, last);
                    return Err(NetworkError::Exhausted);
                }
                Transition::Retry {
                    attempt: next,
                    backoff,
                    cause,
                } => {
                    tracing::warn!(
                        %url,
                        attempt,
                        next_attempt = next,
                        ?backoff,
                        "retryable failure: {}",
                        cause
                    );
                    if !backoff.is_zero() {
                        tokio::select! {
                            biased;
                            _ = abort.aborted() => return Err(cancelled(attempt)),
                            _ = tokio::time::sleep(backoff) => {}
                        }
                    }
                }
            }
        }
    }
}

fn cancelled(attempt: u32) -> NetworkError {
    tracing::info!(attempt, "request cancelled");
    NetworkError::Cancelled
}
