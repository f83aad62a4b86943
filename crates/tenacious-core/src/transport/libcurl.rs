//! libcurl-backed transport.
//!
//! Each attempt uses a fresh `Easy` handle on the blocking pool, so the async
//! executor is never stalled by a transfer.

use super::head::parse_header_lines;
use super::{HttpHead, RawExchange, ResponseHead, Transport, TransportError, TransportErrorKind};
use crate::request::{Method, OutboundRequest};
use curl::easy::{Easy, List};
use std::future::Future;
use std::str;
use std::time::Duration;

/// Per-transfer libcurl settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    /// Hard deadline for the whole transfer.
    pub timeout: Duration,
    pub follow_redirects: bool,
    pub max_redirections: u32,
    pub user_agent: Option<String>,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(60),
            follow_redirects: true,
            max_redirections: 10,
            user_agent: None,
        }
    }
}

/// [`Transport`] implemented with the curl crate.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    options: CurlOptions,
}

impl CurlTransport {
    pub fn new(options: CurlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CurlOptions {
        &self.options
    }
}

impl Transport for CurlTransport {
    fn perform(&self, request: &OutboundRequest) -> impl Future<Output = RawExchange> + Send {
        let request = request.clone();
        let options = self.options.clone();
        async move {
            match tokio::task::spawn_blocking(move || perform_blocking(&request, &options)).await {
                Ok(exchange) => exchange,
                Err(e) => RawExchange::failed(TransportError::new(
                    TransportErrorKind::Other,
                    format!("transfer task failed: {}", e),
                )),
            }
        }
    }
}

/// Runs one transfer on the current thread.
fn perform_blocking(request: &OutboundRequest, options: &CurlOptions) -> RawExchange {
    let mut easy = Easy::new();
    if let Err(e) = configure(&mut easy, request, options) {
        return RawExchange::failed(map_curl_error(&e));
    }

    let mut body = Vec::new();
    let mut header_lines = Vec::new();
    if let Err(e) = transfer(&mut easy, &mut body, &mut header_lines) {
        tracing::debug!(url = %request.url(), "curl transfer failed: {}", e);
        return RawExchange::failed(map_curl_error(&e));
    }

    let code = match easy.response_code() {
        Ok(code) => code,
        Err(e) => return RawExchange::failed(map_curl_error(&e)),
    };

    // libcurl reports 0 for protocols without a status line.
    let head = match u16::try_from(code) {
        Ok(status) if status > 0 => ResponseHead::Http(HttpHead {
            status,
            headers: parse_header_lines(&header_lines),
        }),
        _ => ResponseHead::Other {
            description: format!("{} response without HTTP status", request.url().scheme()),
        },
    };

    RawExchange::with_head(head, Some(body))
}

fn configure(
    easy: &mut Easy,
    request: &OutboundRequest,
    options: &CurlOptions,
) -> Result<(), curl::Error> {
    easy.url(request.url().as_str())?;

    match request.method() {
        Method::Get => easy.get(true)?,
        Method::Head => easy.nobody(true)?,
        Method::Post => {
            easy.post(true)?;
            easy.post_fields_copy(request.body().unwrap_or_default())?;
        }
        other => {
            if let Some(body) = request.body() {
                easy.post_fields_copy(body)?;
            }
            easy.custom_request(other.as_str())?;
        }
    }

    easy.follow_location(options.follow_redirects)?;
    easy.max_redirections(options.max_redirections)?;
    easy.connect_timeout(options.connect_timeout)?;
    easy.timeout(options.timeout)?;
    if let Some(agent) = &options.user_agent {
        easy.useragent(agent)?;
    }

    if !request.headers().is_empty() {
        let mut list = List::new();
        for (k, v) in request.headers() {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        easy.http_headers(list)?;
    }

    Ok(())
}

fn transfer(
    easy: &mut Easy,
    body: &mut Vec<u8>,
    header_lines: &mut Vec<String>,
) -> Result<(), curl::Error> {
    let mut transfer = easy.transfer();
    transfer.header_function(|data| {
        if let Ok(s) = str::from_utf8(data) {
            header_lines.push(s.trim_end().to_string());
        }
        true
    })?;
    transfer.write_function(|data| {
        body.extend_from_slice(data);
        Ok(data.len())
    })?;
    transfer.perform()
}

/// Map a curl error onto the transport taxonomy.
pub(crate) fn map_curl_error(e: &curl::Error) -> TransportError {
    let kind = if e.is_operation_timedout() {
        TransportErrorKind::TimedOut
    } else if e.is_couldnt_resolve_host() {
        TransportErrorKind::CannotFindHost
    } else if e.is_couldnt_resolve_proxy() {
        TransportErrorKind::DnsLookupFailed
    } else if e.is_couldnt_connect() {
        TransportErrorKind::CannotConnectToHost
    } else if e.is_recv_error() || e.is_send_error() || e.is_got_nothing() || e.is_partial_file()
    {
        TransportErrorKind::ConnectionLost
    } else if e.is_url_malformed() {
        TransportErrorKind::BadUrl
    } else if e.is_unsupported_protocol() {
        TransportErrorKind::UnsupportedUrl
    } else if e.is_ssl_connect_error() || e.is_peer_failed_verification() || e.is_ssl_certproblem()
    {
        TransportErrorKind::SecureConnectionFailed
    } else if e.is_too_many_redirects() {
        TransportErrorKind::TooManyRedirects
    } else {
        TransportErrorKind::Other
    };
    TransportError::new(kind, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let o = CurlOptions::default();
        assert_eq!(o.connect_timeout, Duration::from_secs(15));
        assert_eq!(o.timeout, Duration::from_secs(60));
        assert!(o.follow_redirects);
        assert_eq!(o.max_redirections, 10);
        assert!(o.user_agent.is_none());
    }

    #[test]
    fn curl_codes_map_to_kinds() {
        // CURLcode values from curl.h.
        let cases = [
            (3, TransportErrorKind::BadUrl),
            (6, TransportErrorKind::CannotFindHost),
            (7, TransportErrorKind::CannotConnectToHost),
            (28, TransportErrorKind::TimedOut),
            (47, TransportErrorKind::TooManyRedirects),
            (56, TransportErrorKind::ConnectionLost),
            // A bad local interface name is a setup problem, not lost connectivity.
            (45, TransportErrorKind::Other),
        ];
        for (code, kind) in cases {
            let err = map_curl_error(&curl::Error::new(code));
            assert_eq!(err.kind, kind, "CURLcode {}", code);
        }
        assert!(!map_curl_error(&curl::Error::new(45)).kind.is_transient());
    }

    #[tokio::test]
    async fn refused_connection_maps_to_cannot_connect() {
        // Bind then drop to obtain a port nobody listens on.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let request = OutboundRequest::get(&format!("http://127.0.0.1:{}/", port)).unwrap();
        let exchange = CurlTransport::default().perform(&request).await;
        let err = exchange.error.expect("expected transport error");
        assert_eq!(err.kind, TransportErrorKind::CannotConnectToHost);
        assert!(exchange.response.is_none());
    }

    #[tokio::test]
    async fn file_url_is_not_http() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.txt");
        std::fs::write(&path, b"local").unwrap();
        let url = format!("file://{}", path.display());
        let request = OutboundRequest::get(&url).unwrap();
        let exchange = CurlTransport::default().perform(&request).await;
        assert!(exchange.error.is_none());
        assert!(matches!(exchange.response, Some(ResponseHead::Other { .. })));
        assert_eq!(exchange.body.as_deref(), Some(&b"local"[..]));
    }
}
