use std::fmt;

use serde::{Deserialize, Serialize};

use crate::API_VERSION;

/// HTTP methods the REST API is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Returns the method name as an uppercase string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }

    /// Whether parameters travel in the request body rather than the query.
    pub fn has_body(self) -> bool {
        matches!(self, Self::Post)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address a single resource inside a collection (`Messages` + `SM123` ->
/// `Messages/SM123`).
///
/// An empty `id` addresses the collection root. That is not a "fetch all"
/// operation; use a list call instead.
pub fn join_resource_path(collection: &str, id: &str) -> String {
    if id.is_empty() {
        collection.to_owned()
    } else {
        format!("{collection}/{id}")
    }
}

/// Build the full JSON endpoint URL for a resource path.
///
/// `{base}/{API_VERSION}/Accounts/{account_sid}/{resource_path}.json`
pub fn resource_url(base_url: &str, account_sid: &str, resource_path: &str) -> String {
    format!(
        "{}/{API_VERSION}/Accounts/{account_sid}/{resource_path}.json",
        base_url.trim_end_matches('/')
    )
}
