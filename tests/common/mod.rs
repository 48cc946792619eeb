//! Minimal HTTP/1.1 stub standing in for the rendering service

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;

/// A canned reply
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            headers: vec![("Content-Type".into(), "image/svg+xml".into())],
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: format!("status {}", status).into_bytes(),
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            status: 302,
            headers: vec![("Location".into(), location.into())],
            body: Vec::new(),
        }
    }
}

/// What the responder gets to see of an incoming request
pub struct Request<'a> {
    pub path: &'a str,
    /// Zero-based arrival order
    pub index: usize,
    /// Base URL of the stub, for absolute redirects
    pub base: &'a str,
}

/// Serves replies computed per request on a local port
pub struct StubServer {
    pub url: String,
    paths: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub fn start<F>(respond: F) -> Self
    where
        F: Fn(&Request) -> Reply + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let url = format!("http://{}", listener.local_addr().unwrap());
        let paths = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&paths);
        let base = url.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let Some(path) = read_request_path(&mut stream) else { continue };
                let index = {
                    let mut paths = recorded.lock().unwrap();
                    paths.push(path.clone());
                    paths.len() - 1
                };
                let request = Request {
                    path: &path,
                    index,
                    base: &base,
                };
                write_reply(&mut stream, respond(&request));
            }
        });

        Self { url, paths }
    }

    /// Paths of every request received so far, in arrival order
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

/// Reply with an SVG document that echoes the request path
pub fn echo_svg(request: &Request) -> Reply {
    Reply::ok(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><desc>{}</desc></svg>"#,
        request.path
    ))
}

/// Path to a fixture under testdata/
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
}

fn read_request_path(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next()?;
    request_line.split_whitespace().nth(1).map(str::to_string)
}

fn write_reply(stream: &mut TcpStream, reply: Reply) {
    let reason = match reply.status {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        reply.status,
        reason,
        reply.body.len()
    );
    for (name, value) in &reply.headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str("\r\n");

    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&reply.body);
    let _ = stream.flush();
}
