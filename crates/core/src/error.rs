use thiserror::Error;

/// Errors produced while encoding or decoding form data.
#[derive(Debug, Error)]
pub enum FormError {
    /// The form could not be serialized.
    #[error("failed to encode form: {0}")]
    Encode(String),

    /// The body is not a well-formed `application/x-www-form-urlencoded`
    /// document.
    #[error("malformed form body: {0}")]
    Malformed(String),
}

impl From<serde_urlencoded::ser::Error> for FormError {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Self::Encode(err.to_string())
    }
}

impl From<serde_urlencoded::de::Error> for FormError {
    fn from(err: serde_urlencoded::de::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
