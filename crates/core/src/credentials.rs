use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Account identity used for both request signing and webhook validation.
///
/// The auth token is wrapped in [`SecretString`] and the [`Debug`]
/// implementation is redacted, so a `Credentials` value can be logged
/// without leaking the token.
pub struct Credentials {
    account_sid: String,
    auth_token: SecretString,
}

impl Credentials {
    /// Create credentials from an Account SID and Auth Token.
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: SecretString::new(auth_token.into()),
        }
    }

    /// The Account SID (Basic-Auth username and URL path segment).
    pub fn account_sid(&self) -> &str {
        &self.account_sid
    }

    /// The Auth Token (Basic-Auth password and HMAC key).
    pub fn auth_token(&self) -> &SecretString {
        &self.auth_token
    }
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            account_sid: self.account_sid.clone(),
            auth_token: SecretString::new(self.auth_token.expose_secret().clone()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[REDACTED]")
            .finish()
    }
}
