use thiserror::Error;

/// Reasons an inbound request is rejected.
///
/// Messages are deliberately generic: none of them carries the computed
/// signature or the canonical string. The variants exist for logging only.
/// Callers must treat all three as the same outcome, an unauthenticated
/// request, as the axum rejection does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// The claimed signature does not match the expected one.
    #[error("invalid request signature")]
    InvalidSignature,

    /// The request carried no signature header. Handle it exactly like
    /// [`WebhookError::InvalidSignature`].
    #[error("missing request signature")]
    MissingSignature,

    /// The form body could not be decoded.
    #[error("malformed request body")]
    MalformedForm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            WebhookError::InvalidSignature.to_string(),
            "invalid request signature"
        );
        assert_eq!(
            WebhookError::MissingSignature.to_string(),
            "missing request signature"
        );
        assert_eq!(WebhookError::MalformedForm.to_string(), "malformed request body");
    }
}
