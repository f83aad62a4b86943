//! Terminal and intermediate error taxonomy for one logical execution.

use crate::transport::TransportError;

/// Classified failure of an attempt or of a whole execution.
///
/// The set is flat. `Exhausted` and `Cancelled` are only ever produced by the
/// executor; the others come from validating a single exchange.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// Transport failure of a recognised kind, passed through.
    #[error("{0}")]
    Transport(TransportError),

    /// Transport failure that could not be mapped to a known kind.
    #[error("{0}")]
    GeneralTransportFailure(String),

    /// Transport returned neither an error nor a response.
    #[error("Unexpected response received or no response at all.")]
    NoResponse,

    /// A response arrived but is not HTTP.
    #[error("Response is not HTTP response: {0}")]
    InvalidResponseType(String),

    /// Success status with an empty body while empty bodies are disallowed.
    #[error("Response body is empty.")]
    NoResponseData { status: u16 },

    /// Status >= 400. Headers and body are kept for diagnostics.
    #[error("Web service network error: HTTP {status}")]
    EndpointError {
        status: u16,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    },

    /// Retry budget ran out on transient failures. The last cause is dropped.
    #[error("Service not accessible")]
    Exhausted,

    /// The caller aborted the execution.
    #[error("request cancelled")]
    Cancelled,
}

impl NetworkError {
    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::NoResponseData { status } | NetworkError::EndpointError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Multi-line diagnostic text: headers and UTF-8 body for endpoint errors,
    /// the display string otherwise.
    pub fn debug_report(&self) -> String {
        match self {
            NetworkError::EndpointError {
                status,
                headers,
                body,
            } => {
                let mut out = format!("HTTP {}\n", status);
                for (k, v) in headers {
                    out.push_str(&format!("{} : {}\n", k, v));
                }
                out.push('\n');
                out.push_str(&String::from_utf8_lossy(body));
                out
            }
            other => other.to_string(),
        }
    }
}
