//! Test doubles shared by the unit tests in this crate.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::error::Error;
use crate::transport::{OutboundRequest, Response, Transport};

/// In-memory transport that records every request and replays canned
/// responses in FIFO order.
pub struct RecordingTransport {
    requests: Mutex<Vec<OutboundRequest>>,
    responses: Mutex<VecDeque<Result<Response, Error>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push_json(&self, status: u16, body: &str) {
        let response = Response {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: Bytes::from(body.to_owned()),
        };
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_error(&self, err: Error) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> OutboundRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request recorded")
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, request: OutboundRequest) -> Result<Response, Error> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Transport("no canned response".into())))
    }
}

/// A minimal mock HTTP server built on tokio that returns canned responses.
pub struct MockServer {
    listener: tokio::net::TcpListener,
    pub base_url: String,
}

impl MockServer {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock server");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{port}");
        Self { listener, base_url }
    }

    /// Serve a single response and return the raw request that was received.
    pub async fn respond_once(self, status_code: u16, body: &str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let body = body.to_owned();
        let (mut stream, _) = self.listener.accept().await.unwrap();

        let mut raw = Vec::new();
        let mut buf = vec![0u8; 8192];
        loop {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if request_complete(&raw) {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status_code} OK\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n\
             {body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();

        String::from_utf8(raw).unwrap()
    }

    /// Serve one `200` response in two steps: the headers after
    /// `headers_delay`, then `body` after a further `body_delay`.
    pub async fn respond_staggered(
        self,
        headers_delay: Duration,
        body_delay: Duration,
        body: &str,
    ) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let (mut stream, _) = self.listener.accept().await.unwrap();

        let mut raw = Vec::new();
        let mut buf = vec![0u8; 8192];
        while !request_complete(&raw) {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
        }

        tokio::time::sleep(headers_delay).await;
        let head = format!(
            "HTTP/1.1 200 OK\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n",
            body.len()
        );
        // The client may already have given up; ignore write failures.
        if stream.write_all(head.as_bytes()).await.is_err() {
            return;
        }
        let _ = stream.flush().await;

        tokio::time::sleep(body_delay).await;
        let _ = stream.write_all(body.as_bytes()).await;
        let _ = stream.shutdown().await;
    }
}

/// Whether `raw` holds the full header block plus `Content-Length` body bytes.
fn request_complete(raw: &[u8]) -> bool {
    let Some(header_end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let head = String::from_utf8_lossy(&raw[..header_end]).to_ascii_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    raw.len() >= header_end + 4 + content_length
}
