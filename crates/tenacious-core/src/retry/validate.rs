//! Turn a raw exchange into a payload or a classified error.

use super::error::NetworkError;
use crate::transport::{RawExchange, ResponseHead, TransportErrorKind};

/// Validate one physical attempt.
///
/// Rules apply in order: transport error, missing response, non-HTTP
/// response, status >= 400, empty body. An empty body becomes an explicit
/// empty payload when `allow_empty_body` is set.
pub fn validate(exchange: RawExchange, allow_empty_body: bool) -> Result<Vec<u8>, NetworkError> {
    let RawExchange {
        body,
        response,
        error,
    } = exchange;

    if let Some(err) = error {
        return Err(match err.kind {
            TransportErrorKind::Other => NetworkError::GeneralTransportFailure(err.message),
            _ => NetworkError::Transport(err),
        });
    }

    let head = match response {
        None => return Err(NetworkError::NoResponse),
        Some(ResponseHead::Other { description }) => {
            return Err(NetworkError::InvalidResponseType(description))
        }
        Some(ResponseHead::Http(head)) => head,
    };

    if head.status >= 400 {
        return Err(NetworkError::EndpointError {
            status: head.status,
            headers: head.headers,
            body: body.unwrap_or_default(),
        });
    }

    match body {
        Some(body) if !body.is_empty() => Ok(body),
        _ if allow_empty_body => Ok(Vec::new()),
        _ => Err(NetworkError::NoResponseData {
            status: head.status,
        }),
    }
}
