//! Parse HTTP response header lines collected by the transport.

/// Parse raw header lines into `(name, value)` pairs.
///
/// Only the last response block is kept: a status line (`HTTP/...`) starts a
/// new block, so headers from redirects and `100 Continue` are discarded.
pub(crate) fn parse_header_lines(lines: &[String]) -> Vec<(String, String)> {
    let mut headers = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    headers
}
