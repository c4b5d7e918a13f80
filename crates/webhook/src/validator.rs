use std::fmt;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use hmac::{Hmac, Mac};
use http::header::CONTENT_TYPE;
use http::{Method, Request};
use sha1::Sha1;
use subtle::ConstantTimeEq;
use tracing::debug;
use twilio_core::{
    Credentials, ExposeSecret, FORM_CONTENT_TYPE, FormData, SIGNATURE_HEADER, SecretString,
};

use crate::error::WebhookError;

type HmacSha1 = Hmac<Sha1>;

/// Recomputes and checks the `X-Twilio-Signature` of inbound requests.
///
/// The signature is `Base64(HMAC-SHA1(auth_token, canonical))` where the
/// canonical string is the host, the full request URL, and then every form
/// key (byte-wise sorted) immediately followed by its first value, all
/// concatenated without delimiters.
#[derive(Clone)]
pub struct RequestValidator {
    auth_token: Arc<SecretString>,
}

impl RequestValidator {
    /// Validate with the auth token of an account.
    pub fn new(credentials: &Credentials) -> Self {
        Self::from_auth_token(credentials.auth_token().expose_secret().clone())
    }

    pub fn from_auth_token(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: Arc::new(SecretString::new(auth_token.into())),
        }
    }

    /// Compute the signature the service would attach to this request.
    pub fn expected_signature(&self, host: &str, url: &str, form: &FormData) -> String {
        let canonical = canonical_string(host, url, form);
        let mut mac = HmacSha1::new_from_slice(self.auth_token.expose_secret().as_bytes())
            .expect("HMAC accepts any key size");
        mac.update(canonical.as_bytes());
        B64.encode(mac.finalize().into_bytes())
    }

    /// Check `claimed` against the expected signature.
    ///
    /// The comparison is exact (case and padding matter) and runs in
    /// constant time.
    pub fn validate(
        &self,
        host: &str,
        url: &str,
        form: &FormData,
        claimed: &str,
    ) -> Result<(), WebhookError> {
        let expected = self.expected_signature(host, url, form);
        if bool::from(expected.as_bytes().ct_eq(claimed.as_bytes())) {
            Ok(())
        } else {
            debug!("rejected webhook with mismatched signature");
            Err(WebhookError::InvalidSignature)
        }
    }

    /// Validate an HTTP request as received by a server.
    ///
    /// `host` is the scheme and authority the service was configured to
    /// call (e.g. `https://example.com`). The URL is taken from the request
    /// URI exactly as received. Form bodies are parsed for `POST`, `PUT`
    /// and `PATCH` requests sent as `application/x-www-form-urlencoded`;
    /// any other request is signed over an empty parameter set.
    ///
    /// On success the parsed form parameters are returned. The error variant
    /// only says which step failed; every `Err` means the request is not
    /// authentic, and `MissingSignature` deserves no more trust than
    /// `InvalidSignature`.
    pub fn validate_http_request<B: AsRef<[u8]>>(
        &self,
        host: &str,
        request: &Request<B>,
    ) -> Result<FormData, WebhookError> {
        let form = if carries_form_body(request) {
            FormData::parse(request.body().as_ref()).map_err(|e| {
                debug!(error = %e, "rejected webhook with malformed form body");
                WebhookError::MalformedForm
            })?
        } else {
            FormData::new()
        };

        let claimed = request
            .headers()
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(WebhookError::MissingSignature)?;

        let url = request.uri().to_string();
        self.validate(host, &url, &form, claimed)?;
        Ok(form)
    }
}

impl fmt::Debug for RequestValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestValidator")
            .field("auth_token", &"[REDACTED]")
            .finish()
    }
}

/// `host ++ url ++ key1 ++ first(key1) ++ key2 ++ first(key2) ...`
pub(crate) fn canonical_string(host: &str, url: &str, form: &FormData) -> String {
    let mut canonical = String::with_capacity(host.len() + url.len());
    canonical.push_str(host);
    canonical.push_str(url);
    // FormData iterates keys in byte-wise order.
    for (key, values) in form {
        canonical.push_str(key);
        if let Some(first) = values.first() {
            canonical.push_str(first);
        }
    }
    canonical
}

fn carries_form_body<B>(request: &Request<B>) -> bool {
    let method = request.method();
    if method != Method::POST && method != Method::PUT && method != Method::PATCH {
        return false;
    }
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}
