//! Transport failure type, independent of the underlying HTTP library.

use std::fmt;

/// What went wrong below the HTTP layer.
///
/// The first group are conditions that typically clear up on their own
/// (moving through a building, a flaky uplink, a resolver hiccup). The
/// second group are known but permanent. `Other` is anything the transport
/// could not map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// Connect or transfer deadline elapsed.
    TimedOut,
    /// Host name did not resolve.
    CannotFindHost,
    /// TCP connect was refused or failed.
    CannotConnectToHost,
    /// Connection dropped mid-exchange (send/recv failure, empty reply).
    ConnectionLost,
    /// Resolver (or proxy resolution) failed outright.
    DnsLookupFailed,
    /// No usable network interface.
    NotConnectedToInternet,
    /// URL rejected by the transport.
    BadUrl,
    /// Scheme not supported by the transport.
    UnsupportedUrl,
    /// TLS handshake or certificate verification failed.
    SecureConnectionFailed,
    /// Redirect limit reached.
    TooManyRedirects,
    /// Unrecognised failure.
    Other,
}

impl TransportErrorKind {
    /// True for conditions likely to resolve without caller intervention.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            TransportErrorKind::TimedOut
                | TransportErrorKind::CannotFindHost
                | TransportErrorKind::CannotConnectToHost
                | TransportErrorKind::ConnectionLost
                | TransportErrorKind::DnsLookupFailed
                | TransportErrorKind::NotConnectedToInternet
        )
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportErrorKind::TimedOut => "timed out",
            TransportErrorKind::CannotFindHost => "cannot find host",
            TransportErrorKind::CannotConnectToHost => "cannot connect to host",
            TransportErrorKind::ConnectionLost => "network connection lost",
            TransportErrorKind::DnsLookupFailed => "DNS lookup failed",
            TransportErrorKind::NotConnectedToInternet => "not connected to the internet",
            TransportErrorKind::BadUrl => "bad URL",
            TransportErrorKind::UnsupportedUrl => "unsupported URL",
            TransportErrorKind::SecureConnectionFailed => "secure connection failed",
            TransportErrorKind::TooManyRedirects => "too many redirects",
            TransportErrorKind::Other => "transport error",
        };
        f.write_str(s)
    }
}

/// Error reported by a [`Transport`](super::Transport) for one physical attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
