//! Shared primitives for the Twilio REST client and webhook validator.
//!
//! Both halves of the workspace authenticate with the same account identity:
//! the outbound dispatcher sends it as HTTP Basic credentials, and the inbound
//! validator uses the auth token as its HMAC key. This crate holds that
//! identity plus the small amount of wire vocabulary the two sides share.
//!
//! ```rust
//! use twilio_core::{Credentials, FormData};
//!
//! let credentials = Credentials::new("ACXXXXXXXX", "auth_token");
//! let form = FormData::new().with("To", "+15559876543").with("Body", "hi");
//! assert_eq!(credentials.account_sid(), "ACXXXXXXXX");
//! assert_eq!(form.first("Body"), Some("hi"));
//! ```

pub mod credentials;
pub mod error;
pub mod form;
pub mod path;

pub use credentials::Credentials;
pub use error::FormError;
pub use form::FormData;
pub use path::{HttpMethod, join_resource_path, resource_url};

// Re-export for consumers so they don't need a direct `secrecy` dependency.
pub use secrecy::{ExposeSecret, SecretString};

/// Production base URL of the Twilio REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.twilio.com";

/// REST API version segment. Fixed per release of this crate.
pub const API_VERSION: &str = "2010-04-01";

/// Header carrying the signature on inbound webhook requests.
pub const SIGNATURE_HEADER: &str = "X-Twilio-Signature";

/// MIME type for form-encoded request bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
