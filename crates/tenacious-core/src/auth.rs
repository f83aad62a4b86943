//! Authentication hook applied to the outbound request before every attempt.
//!
//! The hook runs once per attempt because credentials may expire between
//! attempts; implementations are free to refresh tokens.

use crate::request::OutboundRequest;
use std::fmt;
use std::future::{self, Future};

/// Transforms the outbound request for attempt `attempt` (1-based).
pub trait Authenticator: Send + Sync {
    fn authenticate(
        &self,
        request: OutboundRequest,
        attempt: u32,
    ) -> impl Future<Output = OutboundRequest> + Send;
}

/// Identity hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl Authenticator for NoAuth {
    fn authenticate(
        &self,
        request: OutboundRequest,
        _attempt: u32,
    ) -> impl Future<Output = OutboundRequest> + Send {
        future::ready(request)
    }
}

/// Sets `Authorization: Bearer <token>` on every attempt.
#[derive(Clone)]
pub struct BearerToken {
    token: String,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken").field("token", &"<redacted>").finish()
    }
}

impl Authenticator for BearerToken {
    fn authenticate(
        &self,
        mut request: OutboundRequest,
        _attempt: u32,
    ) -> impl Future<Output = OutboundRequest> + Send {
        request.set_header("Authorization", format!("Bearer {}", self.token));
        future::ready(request)
    }
}

/// Adapts a synchronous closure into an [`Authenticator`].
pub struct FnAuthenticator<F>(pub F);

impl<F> Authenticator for FnAuthenticator<F>
where
    F: Fn(OutboundRequest, u32) -> OutboundRequest + Send + Sync,
{
    fn authenticate(
        &self,
        request: OutboundRequest,
        attempt: u32,
    ) -> impl Future<Output = OutboundRequest> + Send {
        future::ready((self.0)(request, attempt))
    }
}
