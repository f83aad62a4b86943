//! Minimal HTTP/1.1 server that replays a script of responses for integration tests.
//!
//! Each connection consumes the next scripted response; once the script runs
//! out the last response repeats. Every request is recorded so tests can
//! assert on hit counts and headers.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Scripted {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Scripted {
    pub fn new(status: u16, body: &[u8]) -> Self {
        Self {
            status,
            body: body.to_vec(),
        }
    }
}

#[derive(Default)]
struct State {
    script: Vec<Scripted>,
    requests: Vec<String>,
}

pub struct ScriptedServer {
    pub url: String,
    state: Arc<Mutex<State>>,
}

impl ScriptedServer {
    /// Number of requests served so far.
    pub fn hits(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    /// Raw request heads received, in order.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start(script: Vec<Scripted>) -> ScriptedServer {
    assert!(!script.is_empty(), "script must not be empty");
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new(Mutex::new(State {
        script,
        requests: Vec::new(),
    }));
    let server_state = Arc::clone(&state);
    thread::spawn(move || {
        // Sequential on purpose: the executor never overlaps attempts.
        for stream in listener.incoming().flatten() {
            handle(stream, &server_state);
        }
    });
    ScriptedServer {
        url: format!("http://127.0.0.1:{}/", port),
        state,
    }
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let mut raw = buf[..n].to_vec();
    drain_body(&mut stream, &mut raw);
    let request = String::from_utf8_lossy(&raw).into_owned();

    let response = {
        let mut state = state.lock().unwrap();
        state.requests.push(request);
        if state.script.len() > 1 {
            state.script.remove(0)
        } else {
            state.script[0].clone()
        }
    };

    let head = format!(
        "HTTP/1.1 {} Scripted\r\nContent-Length: {}\r\nX-Scripted: yes\r\nConnection: close\r\n\r\n",
        response.status,
        response.body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&response.body);
}

/// Read the rest of a request body announced by `Content-Length`, so the
/// socket is not reset on close with unread data.
fn drain_body(stream: &mut TcpStream, raw: &mut Vec<u8>) {
    let Some(head_end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
        return;
    };
    let head = String::from_utf8_lossy(&raw[..head_end]).into_owned();
    let expected = request_header(&head, "content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut buf = [0u8; 8192];
    while raw.len() < head_end + 4 + expected {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => raw.extend_from_slice(&buf[..n]),
        }
    }
}

/// Header value from a raw request head (case-insensitive name).
pub fn request_header<'a>(request: &'a str, name: &str) -> Option<&'a str> {
    request.lines().skip(1).find_map(|line| {
        let (k, v) = line.split_once(':')?;
        if k.trim().eq_ignore_ascii_case(name) {
            Some(v.trim())
        } else {
            None
        }
    })
}
