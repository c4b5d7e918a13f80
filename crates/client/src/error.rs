//! Error types for the Twilio client.

use thiserror::Error;
use twilio_core::FormError;

/// Errors that can occur when using the Twilio client.
#[derive(Debug, Error)]
pub enum Error {
    /// The transport failed to deliver the request (DNS, refused
    /// connection, TLS failure, dropped body).
    #[error("transport error: {0}")]
    Transport(String),

    /// The transport gave up waiting for a response.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The API answered with a non-2xx status.
    #[error("Twilio API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Twilio error code, when the body carried one.
        code: Option<i64>,
        /// Error message.
        message: String,
        /// Link to the error reference page.
        more_info: Option<String>,
    },

    /// The response body could not be decoded into the requested type.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The outbound request could not be built.
    #[error("invalid request: {0}")]
    Request(String),

    /// Client configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Returns `true` for failures raised by the transport layer.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }

    /// Returns `true` if the transport timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Returns `true` if this is an API error.
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Returns `true` if the body did not match the requested type.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Returns the Twilio error code if this is an API error.
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => *code,
            _ => None,
        }
    }

    /// Returns the HTTP status if this is an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<FormError> for Error {
    fn from(err: FormError) -> Self {
        Self::Request(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_builder() {
            Self::Request(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
