//! Callback surface: run the executor loop as a task and deliver the
//! terminal outcome to a completion handler exactly once.

use super::{AbortToken, Outcome, RequestExecutor};
use crate::auth::Authenticator;
use crate::request::ExecutionRequest;
use crate::retry::NetworkError;
use crate::transport::Transport;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::{JoinError, JoinHandle};

/// Handle to an execution started with a completion callback.
///
/// Dropping the handle does not cancel the execution.
#[derive(Debug)]
pub struct ExecutionHandle {
    abort: AbortToken,
    task: JoinHandle<()>,
}

impl ExecutionHandle {
    /// Abort the execution. The callback still runs once, with `NetworkError::Cancelled`,
    /// unless the execution already finished.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until the callback has returned.
    pub async fn join(self) -> Result<(), JoinError> {
        self.task.await
    }
}

/// Owns the completion handler until it has been called.
///
/// If the task is dropped before delivering (runtime shutdown, panic in the
/// transport or authenticator), the handler receives `NetworkError::Cancelled`.
struct CallbackGuard<F: FnOnce(Outcome)> {
    callback: Option<F>,
}

impl<F: FnOnce(Outcome)> CallbackGuard<F> {
    fn deliver(mut self, outcome: Outcome) {
        if let Some(callback) = self.callback.take() {
            callback(outcome);
        }
    }
}

impl<F: FnOnce(Outcome)> Drop for CallbackGuard<F> {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            tracing::warn!("execution task dropped before completion");
            callback(Err(NetworkError::Cancelled));
        }
    }
}

impl<T, A> RequestExecutor<T, A>
where
    T: Transport + 'static,
    A: Authenticator + 'static,
{
    /// Start `request` on the current Tokio runtime and invoke `callback` with
    /// the terminal outcome. Intermediate attempts are never reported.
    ///
    /// Outside a runtime nothing is started and the callback is dropped
    /// uncalled; use [`execute_with_callback_on`](Self::execute_with_callback_on)
    /// from plain threads.
    pub fn execute_with_callback<F>(
        &self,
        request: ExecutionRequest,
        callback: F,
    ) -> Result<ExecutionHandle, TryCurrentError>
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        let runtime = Handle::try_current()?;
        Ok(self.execute_with_callback_on(&runtime, request, callback))
    }

    /// Same as [`execute_with_callback`](Self::execute_with_callback) on an explicit runtime.
    pub fn execute_with_callback_on<F>(
        &self,
        runtime: &Handle,
        request: ExecutionRequest,
        callback: F,
    ) -> ExecutionHandle
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        let executor = self.clone();
        let abort = AbortToken::new();
        let task_abort = abort.clone();
        let guard = CallbackGuard {
            callback: Some(callback),
        };
        let task = runtime.spawn(async move {
            let outcome = executor.execute_with_abort(&request, &task_abort).await;
            guard.deliver(outcome);
        });
        ExecutionHandle { abort, task }
    }
}
