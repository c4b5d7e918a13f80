//! Twilio REST client
//!
//! A native Rust client for the Twilio REST API. Every call is a single
//! authenticated HTTP round trip: the client builds the account-scoped URL,
//! attaches HTTP Basic credentials and form-encoded parameters, sends the
//! request through a pluggable [`Transport`], and decodes the JSON body into
//! whatever type the caller asks for.
//!
//! # Quick Start
//!
//! ```no_run
//! use twilio_client::{Client, FormData};
//! use twilio_client::resources::Message;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), twilio_client::Error> {
//!     let client = Client::new("ACXXXXXXXX", "auth_token");
//!
//!     // Generic dispatch into any `DeserializeOwned` target.
//!     let response = client
//!         .create_resource::<serde_json::Value>(
//!             "Messages",
//!             &FormData::new()
//!                 .with("To", "+15559876543")
//!                 .with("From", "+15551234567")
//!                 .with("Body", "Hello!"),
//!         )
//!         .await?;
//!     println!("status: {}", response.status);
//!
//!     // Typed resources.
//!     let message: Message = client.fetch("SM123").await?;
//!     println!("{:?}", message.status);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```no_run
//! use std::time::Duration;
//! use twilio_client::{Client, DecodePolicy};
//!
//! let client = Client::builder("ACXXXXXXXX", "auth_token")
//!     .header_timeout(Duration::from_secs(10))
//!     .decode_policy(DecodePolicy::Lenient)
//!     .build()
//!     .unwrap();
//! ```
//!
//! No retries, caching, or pagination are performed.

mod config;
mod dispatch;
mod error;
pub mod resources;
pub mod transport;

#[cfg(test)]
mod testing;

pub use config::{ClientConfig, DecodePolicy};
pub use dispatch::ApiResponse;
pub use error::Error;
pub use transport::{DynTransport, OutboundRequest, ReqwestTransport, Response, Transport};

// Re-export shared types so callers don't need a direct `twilio_core` dependency.
pub use twilio_core::{Credentials, FormData, HttpMethod};

use std::fmt;
use std::sync::Arc;

/// HTTP client for the Twilio REST API.
///
/// Cheap to clone; clones share the credentials and transport. Safe to use
/// from any number of tasks concurrently.
#[derive(Clone)]
pub struct Client {
    credentials: Arc<Credentials>,
    transport: Arc<dyn DynTransport>,
    api_base_url: String,
    user_agent: String,
    decode_policy: DecodePolicy,
    default_from: Option<String>,
}

/// Builder for configuring a [`Client`].
pub struct ClientBuilder {
    credentials: Credentials,
    config: ClientConfig,
    transport: Option<Arc<dyn DynTransport>>,
    http_client: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Create a new builder with the given Account SID and Auth Token.
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self::from_credentials(Credentials::new(account_sid, auth_token))
    }

    pub fn from_credentials(credentials: Credentials) -> Self {
        Self {
            credentials,
            config: ClientConfig::default(),
            transport: None,
            http_client: None,
        }
    }

    /// Replace every non-credential setting at once.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the API base URL (useful for testing).
    #[must_use]
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config = self.config.with_api_base_url(url);
        self
    }

    /// Set how long the default transport waits for response headers.
    ///
    /// Ignored when a custom transport or `reqwest::Client` is supplied.
    #[must_use]
    pub fn header_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config = self.config.with_header_timeout(timeout);
        self
    }

    #[must_use]
    pub fn decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.config = self.config.with_decode_policy(policy);
        self
    }

    /// Set the default "From" number used by [`Messages::send`](resources::Messages::send).
    #[must_use]
    pub fn default_from(mut self, number: impl Into<String>) -> Self {
        self.config = self.config.with_default_from(number);
        self
    }

    #[must_use]
    pub fn user_agent_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config = self.config.with_user_agent_suffix(suffix);
        self
    }

    /// Use a custom transport.
    #[must_use]
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Use an already shared transport.
    #[must_use]
    pub fn dyn_transport(mut self, transport: Arc<dyn DynTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom reqwest Client with the default transport.
    ///
    /// Useful for configuring TLS, proxies, or other advanced settings.
    #[must_use]
    pub fn reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<Client, Error> {
        let transport: Arc<dyn DynTransport> = match (self.transport, self.http_client) {
            (Some(t), _) => t,
            (None, Some(c)) => Arc::new(ReqwestTransport::with_client(c)),
            (None, None) => Arc::new(ReqwestTransport::new(self.config.header_timeout())?),
        };

        let api_base_url = self.config.api_base_url.trim_end_matches('/').to_owned();
        if api_base_url.is_empty() {
            return Err(Error::Configuration("api_base_url must not be empty".into()));
        }

        Ok(Client {
            credentials: Arc::new(self.credentials),
            transport,
            api_base_url,
            user_agent: user_agent(self.config.user_agent_suffix.as_deref()),
            decode_policy: self.config.decode_policy,
            default_from: self.config.default_from,
        })
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .field("custom_transport", &self.transport.is_some())
            .finish_non_exhaustive()
    }
}

fn user_agent(suffix: Option<&str>) -> String {
    let base = format!(
        "twilio-rust/{} ({} {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    match suffix {
        Some(s) if !s.is_empty() => format!("{base} {s}"),
        _ => base,
    }
}

impl Client {
    /// Create a new client with the default configuration and transport.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use twilio_client::Client;
    ///
    /// let client = Client::new("ACXXXXXXXX", "auth_token");
    /// ```
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        ClientBuilder::new(account_sid, auth_token)
            .build()
            .expect("default client configuration should not fail")
    }

    /// Create a builder for advanced configuration.
    pub fn builder(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> ClientBuilder {
        ClientBuilder::new(account_sid, auth_token)
    }

    /// The account identity this client authenticates as.
    ///
    /// Pass it to `twilio_webhook::RequestValidator::new` to validate
    /// inbound webhooks with the same auth token.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn account_sid(&self) -> &str {
        self.credentials.account_sid()
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn decode_policy(&self) -> DecodePolicy {
        self.decode_policy
    }

    pub(crate) fn default_from(&self) -> Option<&str> {
        self.default_from.as_deref()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("credentials", &self.credentials)
            .field("api_base_url", &self.api_base_url)
            .field("decode_policy", &self.decode_policy)
            .finish_non_exhaustive()
    }
}
