use std::time::Duration;

use serde::Deserialize;

/// What to do when a successful response body does not decode into the
/// requested type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// Return [`Error::Decode`](crate::Error::Decode).
    #[default]
    Strict,
    /// Drop the decode error and return the response with `data: None`.
    Lenient,
}

/// Client settings that are independent of the account credentials.
///
/// Deserializable so it can live in an application's config file:
///
/// ```toml
/// api_base_url = "https://api.twilio.com"
/// header_timeout_ms = 3050
/// decode_policy = "strict"
/// default_from = "+15551234567"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Base URL for the REST API. Override this for testing against a mock
    /// server.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// How long the default transport waits for response headers, in
    /// milliseconds. The body read afterwards is not bounded.
    #[serde(default = "default_header_timeout_ms")]
    pub header_timeout_ms: u64,

    /// Behavior when a response body fails to decode.
    #[serde(default)]
    pub decode_policy: DecodePolicy,

    /// Default "From" phone number (E.164 format) for outbound messages.
    #[serde(default)]
    pub default_from: Option<String>,

    /// Appended to the `User-Agent` header, e.g. `"my-app/1.2"`.
    #[serde(default)]
    pub user_agent_suffix: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            header_timeout_ms: default_header_timeout_ms(),
            decode_policy: DecodePolicy::default(),
            default_from: None,
            user_agent_suffix: None,
        }
    }
}

impl ClientConfig {
    /// Response header wait as a [`Duration`].
    pub fn header_timeout(&self) -> Duration {
        Duration::from_millis(self.header_timeout_ms)
    }

    /// Override the API base URL (useful for testing).
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set how long the default transport waits for response headers.
    #[must_use]
    pub fn with_header_timeout(mut self, timeout: Duration) -> Self {
        self.header_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }

    /// Set the default "From" phone number.
    #[must_use]
    pub fn with_default_from(mut self, number: impl Into<String>) -> Self {
        self.default_from = Some(number.into());
        self
    }

    #[must_use]
    pub fn with_user_agent_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.user_agent_suffix = Some(suffix.into());
        self
    }
}

fn default_api_base_url() -> String {
    twilio_core::DEFAULT_API_BASE_URL.to_owned()
}

fn default_header_timeout_ms() -> u64 {
    3050
}
