//! Typed resources layered on the generic dispatcher.
//!
//! A resource is a plain data shape tied to a collection name. The
//! dispatcher itself stays type-agnostic; these helpers only supply the
//! collection and the decode target.

mod message;

pub use message::{Message, MessageList, Messages, SendMessage};

use serde::de::DeserializeOwned;
use twilio_core::FormData;

use crate::{Client, Error};

/// A remote entity addressable under `/Accounts/{sid}/{COLLECTION}`.
pub trait Resource: DeserializeOwned + Send {
    /// Collection path segment, e.g. `"Messages"`.
    const COLLECTION: &'static str;

    /// Decode target for list responses.
    type List: DeserializeOwned + Send;
}

impl Client {
    /// Fetch one `R` by identifier.
    pub async fn fetch<R: Resource>(&self, id: &str) -> Result<R, Error> {
        if id.is_empty() {
            return Err(Error::Request(format!(
                "{} identifier must not be empty",
                R::COLLECTION
            )));
        }
        self.get_resource::<R>(R::COLLECTION, id)
            .await?
            .into_data()
    }

    pub async fn create<R: Resource>(&self, data: &FormData) -> Result<R, Error> {
        self.create_resource::<R>(R::COLLECTION, data)
            .await?
            .into_data()
    }

    pub async fn update<R: Resource>(&self, id: &str, data: &FormData) -> Result<R, Error> {
        if id.is_empty() {
            return Err(Error::Request(format!(
                "{} identifier must not be empty",
                R::COLLECTION
            )));
        }
        self.update_resource::<R>(R::COLLECTION, id, data)
            .await?
            .into_data()
    }

    /// List `R` with the given filter parameters. Returns one page.
    pub async fn list<R: Resource>(&self, params: &FormData) -> Result<R::List, Error> {
        self.list_resource::<R::List>(R::COLLECTION, params)
            .await?
            .into_data()
    }
}
