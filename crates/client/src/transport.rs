//! The HTTP seam between the dispatcher and the network.
//!
//! The dispatcher builds a fully-formed [`OutboundRequest`] (URL, headers,
//! body) and hands it to a [`Transport`]. Anything that can perform one
//! request/response round trip can stand in for the default
//! [`ReqwestTransport`]: a shared connection pool, a proxying client, or a
//! fake in tests.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use twilio_core::HttpMethod;

use crate::error::Error;

/// A request ready to be put on the wire.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    /// Absolute URL including any query string.
    pub url: String,
    /// The `Authorization` value is marked sensitive and prints as
    /// `Sensitive` in debug output.
    pub headers: HeaderMap,
    /// Form-encoded body for `POST` requests.
    pub body: Option<String>,
}

/// A fully-buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Strongly-typed transport trait with native `async fn`.
///
/// Not object-safe; every `Transport` automatically implements
/// [`DynTransport`], which is what [`Client`](crate::Client) stores.
pub trait Transport: Send + Sync {
    /// Perform one round trip. Implementations own timeouts and must not
    /// retry.
    fn send(
        &self,
        request: OutboundRequest,
    ) -> impl std::future::Future<Output = Result<Response, Error>> + Send;
}

/// Object-safe transport trait for use behind `Arc<dyn DynTransport>`.
///
/// Implement [`Transport`] and rely on the blanket implementation.
#[async_trait]
pub trait DynTransport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<Response, Error>;
}

#[async_trait]
impl<T: Transport + Sync> DynTransport for T {
    async fn send(&self, request: OutboundRequest) -> Result<Response, Error> {
        Transport::send(self, request).await
    }
}

/// Default transport backed by a [`reqwest::Client`].
///
/// The header timeout bounds only the wait for the response status line and
/// headers. Once they arrive the body is read to completion, however long
/// that takes.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    header_timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Build a transport whose requests fail with [`Error::Timeout`] when no
    /// response headers arrive within `header_timeout`.
    pub fn new(header_timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Configuration(e.to_string()))?;
        Ok(Self {
            client,
            header_timeout: Some(header_timeout),
        })
    }

    /// Wrap an existing `reqwest::Client`.
    ///
    /// Useful for sharing a connection pool or configuring proxies and TLS.
    /// No header timeout is applied beyond what `client` enforces itself.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            header_timeout: None,
        }
    }

    #[must_use]
    pub fn with_header_timeout(mut self, header_timeout: Duration) -> Self {
        self.header_timeout = Some(header_timeout);
        self
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<Response, Error> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self
            .client
            .request(method, &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        // `send` resolves as soon as the headers are in.
        let pending = builder.send();
        let response = match self.header_timeout {
            Some(limit) => tokio::time::timeout(limit, pending).await.map_err(|_| {
                Error::Timeout(format!(
                    "no response headers within {} ms",
                    limit.as_millis()
                ))
            })??,
            None => pending.await?,
        };
        let status = response.status();
        let headers = response.headers().clone();
        // No size cap and no deadline: the whole body is buffered.
        let body = response.bytes().await?;

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::{MockServer, RecordingTransport};

    fn get_request(url: String) -> OutboundRequest {
        OutboundRequest {
            method: HttpMethod::Get,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn blanket_dyn_transport_impl() {
        let recorder = Arc::new(RecordingTransport::new());
        recorder.push_json(200, r#"{"ok":true}"#);

        let transport: Arc<dyn DynTransport> = recorder.clone();
        let response = transport
            .send(get_request("http://example.test/".into()))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(&response.body[..], br#"{"ok":true}"#);
        assert_eq!(recorder.requests().len(), 1);
    }

    #[tokio::test]
    async fn reqwest_transport_round_trip() {
        let server = MockServer::start().await;
        let url = format!("{}/ping", server.base_url);
        let handle = tokio::spawn(async move { server.respond_once(200, r#"{"pong":1}"#).await });

        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let response = Transport::send(&transport, get_request(url)).await.unwrap();
        let raw = handle.await.unwrap();

        assert!(raw.starts_with("GET /ping HTTP/1.1"));
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(&response.body[..], br#"{"pong":1}"#);
    }

    #[tokio::test]
    async fn reqwest_transport_sends_post_body() {
        let server = MockServer::start().await;
        let url = format!("{}/form", server.base_url);
        let handle = tokio::spawn(async move { server.respond_once(201, "{}").await });

        let mut request = get_request(url);
        request.method = HttpMethod::Post;
        request.body = Some("Body=hi".into());

        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let response = Transport::send(&transport, request).await.unwrap();
        let raw = handle.await.unwrap();

        assert!(raw.starts_with("POST /form HTTP/1.1"));
        assert!(raw.ends_with("\r\n\r\nBody=hi"));
        assert_eq!(response.status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn reqwest_transport_connection_refused() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let err = Transport::send(&transport, get_request(format!("http://127.0.0.1:{port}/")))
            .await
            .unwrap_err();
        assert!(err.is_transport_error());
    }

    #[tokio::test]
    async fn slow_body_is_not_cut_off_by_header_timeout() {
        let server = MockServer::start().await;
        let url = format!("{}/slow-body", server.base_url);
        let handle = tokio::spawn(async move {
            server
                .respond_staggered(Duration::ZERO, Duration::from_millis(600), "{}")
                .await;
        });

        let transport = ReqwestTransport::new(Duration::from_millis(200)).unwrap();
        let response = Transport::send(&transport, get_request(url)).await.unwrap();
        handle.await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(&response.body[..], b"{}");
    }

    #[tokio::test]
    async fn slow_headers_time_out() {
        let server = MockServer::start().await;
        let url = format!("{}/slow-headers", server.base_url);
        let handle = tokio::spawn(async move {
            server
                .respond_staggered(Duration::from_millis(600), Duration::ZERO, "{}")
                .await;
        });

        let transport = ReqwestTransport::new(Duration::from_millis(100)).unwrap();
        let err = Transport::send(&transport, get_request(url))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        handle.abort();
    }
}
