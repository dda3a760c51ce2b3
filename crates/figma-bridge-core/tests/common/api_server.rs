//! Minimal HTTP/1.1 server standing in for the Figma API and its image CDN.
//!
//! Serves fixed responses keyed by request target (path + query) and records
//! every request it sees together with its `X-Figma-Token` header.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Route {
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: body.to_string().into_bytes(),
        }
    }

    pub fn bytes(body: &[u8]) -> Self {
        Self {
            status: 200,
            content_type: "application/octet-stream",
            body: body.to_vec(),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub target: String,
    pub token: Option<String>,
}

pub struct ApiServer {
    pub base_url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl ApiServer {
    /// Targets requested so far, in arrival order.
    pub fn targets(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|r| r.target.clone()).collect()
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

/// Starts the server in a background thread. `routes` receives the base URL
/// (e.g. "http://127.0.0.1:12345") so bodies can point back at the server.
/// The server runs until the process exits.
pub fn start(routes: impl FnOnce(&str) -> Vec<(String, Route)>) -> ApiServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base_url = format!("http://127.0.0.1:{}", port);
    let routes: Arc<HashMap<String, Route>> = Arc::new(routes(&base_url).into_iter().collect());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_bg = Arc::clone(&seen);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let seen = Arc::clone(&seen_bg);
            thread::spawn(move || handle(stream, &routes, &seen));
        }
    });
    ApiServer { base_url, seen }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Route>,
    seen: &Mutex<Vec<SeenRequest>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (target, token) = parse_request(request);
    seen.lock().unwrap().push(SeenRequest {
        target: target.clone(),
        token,
    });

    let not_found = Route::status(404, r#"{"status":404,"err":"Not found"}"#);
    let route = routes.get(&target).unwrap_or(&not_found);
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        route.status,
        reason(route.status),
        route.content_type,
        route.body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&route.body);
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Returns (request target, X-Figma-Token value).
fn parse_request(request: &str) -> (String, Option<String>) {
    let mut target = String::new();
    let mut token = None;
    for (i, line) in request.lines().enumerate() {
        let line = line.trim();
        if i == 0 {
            target = line.split_whitespace().nth(1).unwrap_or("").to_string();
            continue;
        }
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("x-figma-token") {
                token = Some(value.trim().to_string());
            }
        }
    }
    (target, token)
}
