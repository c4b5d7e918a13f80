//! axum integration: an extractor that only yields verified form bodies.

use axum::Json;
use axum::body::to_bytes;
use axum::extract::{FromRef, FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::warn;
use twilio_core::FormData;

use crate::error::WebhookError;
use crate::validator::RequestValidator;

/// Largest inbound body buffered for validation.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Validator plus the public host the service was configured to call.
///
/// Make it reachable from router state with [`FromRef`].
#[derive(Debug, Clone)]
pub struct WebhookContext {
    pub validator: RequestValidator,
    pub host: String,
    pub body_limit: usize,
}

impl WebhookContext {
    pub fn new(validator: RequestValidator, host: impl Into<String>) -> Self {
        Self {
            validator,
            host: host.into(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    #[must_use]
    pub fn with_body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }
}

/// Form parameters of a request whose signature checked out.
#[derive(Debug, Clone)]
pub struct TwilioWebhook(pub FormData);

impl<S> FromRequest<S> for TwilioWebhook
where
    WebhookContext: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = WebhookRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = WebhookContext::from_ref(state);
        let (parts, body) = req.into_parts();
        let bytes = to_bytes(body, ctx.body_limit).await.map_err(|e| {
            warn!(error = %e, "failed to buffer webhook body");
            WebhookRejection(WebhookError::MalformedForm)
        })?;
        let request = http::Request::from_parts(parts, bytes);

        match ctx.validator.validate_http_request(&ctx.host, &request) {
            Ok(form) => Ok(Self(form)),
            Err(e) => {
                warn!(path = %request.uri().path(), reason = %e, "rejected webhook request");
                Err(WebhookRejection(e))
            }
        }
    }
}

/// Rejection for [`TwilioWebhook`]. Always `403 Forbidden` with a generic body.
#[derive(Debug)]
pub struct WebhookRejection(pub WebhookError);

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({ "error": "invalid request" })),
        )
            .into_response()
    }
}
