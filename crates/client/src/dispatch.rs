use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use http::header::{ACCEPT, ACCEPT_CHARSET, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderValue, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use twilio_core::{
    ExposeSecret, FORM_CONTENT_TYPE, FormData, HttpMethod, join_resource_path, resource_url,
};

use crate::config::DecodePolicy;
use crate::transport::OutboundRequest;
use crate::{Client, Error};

/// A response together with its decoded body.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// `None` only under [`DecodePolicy::Lenient`] when the body did not
    /// decode.
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Take the decoded body, failing if it was dropped by the lenient policy.
    pub fn into_data(self) -> Result<T, Error> {
        self.data
            .ok_or_else(|| Error::Decode("response body did not decode into the target".into()))
    }
}

/// Error document returned by the API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<i64>,
    message: Option<String>,
    more_info: Option<String>,
}

impl Client {
    /// Fetch a single resource: `GET {collection}/{id}.json`.
    ///
    /// An empty `id` addresses the collection root instead.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> Result<(), twilio_client::Error> {
    /// use twilio_client::Client;
    ///
    /// let client = Client::new("ACXXXXXXXX", "auth_token");
    /// let response = client
    ///     .get_resource::<serde_json::Value>("Messages", "SM123")
    ///     .await?;
    /// println!("{:?}", response.data);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_resource<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<ApiResponse<T>, Error> {
        let path = join_resource_path(collection, id);
        self.make_request(HttpMethod::Get, &path, None).await
    }

    /// Create a resource: `POST {collection}.json` with `data` as the body.
    pub async fn create_resource<T: DeserializeOwned>(
        &self,
        collection: &str,
        data: &FormData,
    ) -> Result<ApiResponse<T>, Error> {
        self.make_request(HttpMethod::Post, collection, Some(data))
            .await
    }

    /// Update a resource: `POST {collection}/{id}.json` with `data` as the
    /// body.
    pub async fn update_resource<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        data: &FormData,
    ) -> Result<ApiResponse<T>, Error> {
        let path = join_resource_path(collection, id);
        self.make_request(HttpMethod::Post, &path, Some(data)).await
    }

    /// List a collection: `GET {collection}.json?{params}`.
    pub async fn list_resource<T: DeserializeOwned>(
        &self,
        collection: &str,
        params: &FormData,
    ) -> Result<ApiResponse<T>, Error> {
        self.make_request(HttpMethod::Get, collection, Some(params))
            .await
    }

    /// Send one request and decode the JSON body into `T`.
    ///
    /// Non-2xx responses become [`Error::Api`]. A 2xx body that does not
    /// decode becomes [`Error::Decode`] unless the client was built with
    /// [`DecodePolicy::Lenient`].
    #[instrument(name = "twilio.request", skip_all, fields(method = %method, path = %resource_path))]
    pub async fn make_request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        resource_path: &str,
        params: Option<&FormData>,
    ) -> Result<ApiResponse<T>, Error> {
        let request = self.create_request(method, resource_path, params)?;

        debug!("sending request");
        let response = self.transport.send(request).await?;
        let status = response.status;
        debug!(status = status.as_u16(), bytes = response.body.len(), "received response");

        if !status.is_success() {
            return Err(api_error(status, &response.body));
        }

        let data = match serde_json::from_slice::<T>(&response.body) {
            Ok(value) => Some(value),
            Err(e) => match self.decode_policy {
                DecodePolicy::Strict => return Err(Error::Decode(e.to_string())),
                DecodePolicy::Lenient => {
                    debug!(error = %e, "discarding response body that did not decode");
                    None
                }
            },
        };

        Ok(ApiResponse {
            status,
            headers: response.headers,
            data,
        })
    }

    /// Build the authenticated request without sending it.
    ///
    /// `GET` parameters are appended after `?`; `POST` parameters become a
    /// form-encoded body. Empty parameter sets add neither.
    pub fn create_request(
        &self,
        method: HttpMethod,
        resource_path: &str,
        params: Option<&FormData>,
    ) -> Result<OutboundRequest, Error> {
        if resource_path.is_empty() || resource_path.contains(['?', '#']) {
            return Err(Error::Request(format!(
                "invalid resource path {resource_path:?}"
            )));
        }

        let mut url = resource_url(
            &self.api_base_url,
            self.credentials.account_sid(),
            resource_path,
        );

        let encoded = match params {
            Some(p) if !p.is_empty() => Some(p.encode()?),
            _ => None,
        };

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.basic_auth_header()?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_CHARSET, HeaderValue::from_static("utf-8"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .map_err(|e| Error::Request(format!("invalid User-Agent: {e}")))?,
        );

        let body = match (method, encoded) {
            (HttpMethod::Get, Some(query)) => {
                url.push('?');
                url.push_str(&query);
                None
            }
            (HttpMethod::Post, Some(body)) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
                Some(body)
            }
            (_, None) => None,
        };

        reqwest::Url::parse(&url).map_err(|e| Error::Request(format!("invalid URL: {e}")))?;

        Ok(OutboundRequest {
            method,
            url,
            headers,
            body,
        })
    }

    fn basic_auth_header(&self) -> Result<HeaderValue, Error> {
        let raw = format!(
            "{}:{}",
            self.credentials.account_sid(),
            self.credentials.auth_token().expose_secret()
        );
        let mut value = HeaderValue::from_str(&format!("Basic {}", B64.encode(raw)))
            .map_err(|_| Error::Request("credentials do not form a valid header".into()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

fn api_error(status: StatusCode, body: &[u8]) -> Error {
    match serde_json::from_slice::<ApiErrorBody>(body) {
        Ok(doc) => Error::Api {
            status: status.as_u16(),
            code: doc.code,
            message: doc
                .message
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_owned()),
            more_info: doc.more_info,
        },
        Err(_) => Error::Api {
            status: status.as_u16(),
            code: None,
            message: String::from_utf8_lossy(body).into_owned(),
            more_info: None,
        },
    }
}
