//! Verification of inbound Twilio webhook requests.
//!
//! Twilio signs every callback it sends with the account auth token. A
//! receiving server recomputes the signature over the public URL and the
//! form parameters and compares it to the `X-Twilio-Signature` header.
//!
//! ```rust
//! use twilio_webhook::RequestValidator;
//! use twilio_core::FormData;
//!
//! let validator = RequestValidator::from_auth_token("secret");
//! let form = FormData::new().with("Body", "hi");
//! let signature = validator.expected_signature("https://example.com", "/sms", &form);
//! assert!(validator.validate("https://example.com", "/sms", &form, &signature).is_ok());
//! ```
//!
//! With the `axum` feature, [`TwilioWebhook`] extracts only requests whose
//! signature checks out and rejects everything else with `403 Forbidden`.

pub mod error;
#[cfg(feature = "axum")]
pub mod extract;
pub mod validator;

pub use error::WebhookError;
#[cfg(feature = "axum")]
pub use extract::{DEFAULT_BODY_LIMIT, TwilioWebhook, WebhookContext, WebhookRejection};
pub use validator::RequestValidator;
