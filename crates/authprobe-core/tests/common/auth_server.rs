//! Minimal HTTP/1.1 server guarded by Basic auth, for integration tests.
//!
//! Answers GET with 200 and a fixed body when the `Authorization` header
//! matches, otherwise 401 Unauthorized. Every request's head is recorded.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Method, path and header lines of one received request.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub struct AuthServer {
    pub url: String,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

impl AuthServer {
    pub fn requests(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. Requests carrying
/// `Authorization: <expected_auth>` get `body`; anything else gets 401.
pub fn start(expected_auth: &str, body: &str) -> AuthServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let expected = expected_auth.to_string();
    let body = body.to_string();
    let rec = Arc::clone(&recorded);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let rec = Arc::clone(&rec);
            let expected = expected.clone();
            let body = body.clone();
            thread::spawn(move || handle(stream, &expected, &body, &rec));
        }
    });
    AuthServer {
        url: format!("http://127.0.0.1:{}/api", port),
        recorded,
    }
}

fn handle(mut stream: TcpStream, expected: &str, body: &str, rec: &Mutex<Vec<Recorded>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
    let head = String::from_utf8_lossy(&data).into_owned();
    let request = parse_head(&head);
    let authorized = request.header("authorization") == Some(expected);
    rec.lock().unwrap().push(request);

    let response = if authorized {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
    } else {
        "HTTP/1.1 401 Unauthorized\r\nWWW-Authenticate: Basic realm=\"test\"\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string()
    };
    let _ = stream.write_all(response.as_bytes());
}

fn parse_head(head: &str) -> Recorded {
    let mut lines = head.lines();
    let mut first = lines.next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("").to_string();
    let path = first.next().unwrap_or("").to_string();
    let headers = lines
        .take_while(|l| !l.trim().is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    Recorded {
        method,
        path,
        headers,
    }
}
