//! Outbound request model and the immutable description of one logical execution.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default bound on physical attempts per logical execution.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
const DEFAULT_MAX_ATTEMPTS_NONZERO: NonZeroU32 = match NonZeroU32::new(DEFAULT_MAX_ATTEMPTS) {
    Some(n) => n,
    None => panic!("DEFAULT_MAX_ATTEMPTS must be non-zero"),
};
/// Default fixed wait between retryable attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// Rejected request construction. Raised before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRequest {
    #[error("invalid URL {url:?}: {reason}")]
    Url { url: String, reason: String },
    #[error("max_attempts must be 1 or larger")]
    ZeroAttempts,
    #[error("unknown HTTP method {0:?}")]
    UnknownMethod(String),
    #[error("invalid header {0:?}, expected \"Name: value\"")]
    Header(String),
}

/// HTTP method of an outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = InvalidRequest;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "HEAD" => Ok(Method::Head),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            _ => Err(InvalidRequest::UnknownMethod(s.to_string())),
        }
    }
}

/// The request handed to the transport on each attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    method: Method,
    url: Url,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl OutboundRequest {
    pub fn new(method: Method, url: &str) -> Result<Self, InvalidRequest> {
        let url = Url::parse(url).map_err(|e| InvalidRequest::Url {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn get(url: &str) -> Result<Self, InvalidRequest> {
        Self::new(Method::Get, url)
    }

    /// Append a header. Use [`set_header`](Self::set_header) to replace.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Parse a `"Name: value"` line and append it.
    pub fn with_header_line(self, line: &str) -> Result<Self, InvalidRequest> {
        match line.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok(self.with_header(name.trim(), value.trim()))
            }
            _ => Err(InvalidRequest::Header(line.to_string())),
        }
    }

    /// Replace every header named `name` (case-insensitive) with a single value.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header value matching `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Process-wide execution defaults, applied at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionDefaults {
    pub max_attempts: u32,
    pub retry_interval: Duration,
    pub allow_empty_body: bool,
}

impl Default for ExecutionDefaults {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            allow_empty_body: false,
        }
    }
}

/// Immutable description of one logical execution.
///
/// `max_attempts` bounds physical transport calls, so 1 means no retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    request: OutboundRequest,
    max_attempts: NonZeroU32,
    retry_interval: Duration,
    allow_empty_body: bool,
}

impl ExecutionRequest {
    /// Wrap `request` with the built-in defaults (10 attempts, 500ms, no empty body).
    pub fn new(request: OutboundRequest) -> Self {
        Self {
            request,
            max_attempts: DEFAULT_MAX_ATTEMPTS_NONZERO,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            allow_empty_body: false,
        }
    }

    /// Wrap `request` with configured defaults.
    pub fn with_defaults(
        request: OutboundRequest,
        defaults: &ExecutionDefaults,
    ) -> Result<Self, InvalidRequest> {
        Ok(Self::new(request)
            .with_max_attempts(defaults.max_attempts)?
            .with_retry_interval(defaults.retry_interval)
            .with_allow_empty_body(defaults.allow_empty_body))
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Result<Self, InvalidRequest> {
        self.max_attempts = NonZeroU32::new(max_attempts).ok_or(InvalidRequest::ZeroAttempts)?;
        Ok(self)
    }

    /// Zero means retry immediately.
    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    pub fn with_allow_empty_body(mut self, allow: bool) -> Self {
        self.allow_empty_body = allow;
        self
    }

    pub fn request(&self) -> &OutboundRequest {
        &self.request
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.get()
    }

    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    pub fn allows_empty_body(&self) -> bool {
        self.allow_empty_body
    }
}
