//! Execute one logical HTTP request over an unreliable network.
//!
//! [`RequestExecutor`] issues the request through a [`Transport`], classifies
//! every outcome into a [`NetworkError`] or a payload, and retries transient
//! failures with a fixed backoff until success, a permanent error, or the
//! attempt budget runs out.

pub mod auth;
pub mod config;
pub mod executor;
pub mod logging;
pub mod request;
pub mod retry;
pub mod transport;

pub use auth::{Authenticator, BearerToken, FnAuthenticator, NoAuth};
pub use executor::{AbortToken, ExecutionHandle, Outcome, RequestExecutor};
pub use request::{ExecutionDefaults, ExecutionRequest, InvalidRequest, Method, OutboundRequest};
pub use retry::NetworkError;
pub use transport::{CurlOptions, CurlTransport, RawExchange, Transport};
