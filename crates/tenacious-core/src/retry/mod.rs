//! Outcome classification and retry policy.
//!
//! This module turns a raw transport exchange into a typed outcome
//! (`validate`), decides whether an error is transient (`classify`), and
//! tracks attempts for one execution (`policy`), so the executor only has to
//! drive the loop.

mod classify;
mod error;
mod policy;
mod validate;

pub use classify::{classify, is_retryable_status, should_retry, RETRYABLE_STATUSES};
pub use error::NetworkError;
pub use policy::{AttemptState, RetryDecision, RetryPolicy, Transition};
pub use validate::validate;
