//! Abort token shared between a caller and one in-flight execution.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    aborted: AtomicBool,
    notify: Notify,
}

/// Cloneable cancellation signal. Once set it stays set.
#[derive(Debug, Clone, Default)]
pub struct AbortToken {
    inner: Arc<Inner>,
}

impl AbortToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request abort; wakes any pending transport call or backoff wait.
    pub fn abort(&self) {
        self.inner.aborted.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_aborted(&self) -> bool {
        self.inner.aborted.load(Ordering::SeqCst)
    }

    /// Resolves once [`abort`](Self::abort) has been called.
    pub async fn aborted(&self) {
        loop {
            // Register before checking the flag so a concurrent abort is not missed.
            let notified = self.inner.notify.notified();
            if self.is_aborted() {
                return;
            }
            notified.await;
        }
    }
}
