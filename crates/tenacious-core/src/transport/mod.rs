//! Transport capability consumed by the executor.
//!
//! A transport performs exactly one physical HTTP exchange and reports what
//! happened without interpreting it: a body, response metadata, or an error.
//! Classification and retries live in [`crate::retry`] and [`crate::executor`].

mod error;
mod head;
mod libcurl;

pub use error::{TransportError, TransportErrorKind};
pub use libcurl::{CurlOptions, CurlTransport};

use crate::request::OutboundRequest;
use std::future::Future;

/// Status line and headers of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpHead {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

impl HttpHead {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    /// First header value matching `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response metadata reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseHead {
    /// HTTP-shaped response with a numeric status.
    Http(HttpHead),
    /// A response that is not HTTP (e.g. `file://` or `ftp://` targets).
    Other { description: String },
}

/// Raw result of one physical attempt.
///
/// Well-behaved transports populate either `error`, or `response` (with an
/// optional `body`). The validator still copes with neither being set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawExchange {
    pub body: Option<Vec<u8>>,
    pub response: Option<ResponseHead>,
    pub error: Option<TransportError>,
}

impl RawExchange {
    /// An HTTP response with the given status and body.
    pub fn http(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: Some(body.into()),
            response: Some(ResponseHead::Http(HttpHead::new(status))),
            error: None,
        }
    }

    /// A response carrying full head metadata.
    pub fn with_head(head: ResponseHead, body: Option<Vec<u8>>) -> Self {
        Self {
            body,
            response: Some(head),
            error: None,
        }
    }

    /// A transport-level failure.
    pub fn failed(error: TransportError) -> Self {
        Self {
            body: None,
            response: None,
            error: Some(error),
        }
    }
}

/// Performs one physical HTTP exchange.
///
/// Implementations must not retry internally; the executor owns attempt
/// counting. Dropping the returned future abandons the attempt.
pub trait Transport: Send + Sync {
    fn perform(&self, request: &OutboundRequest) -> impl Future<Output = RawExchange> + Send;
}
