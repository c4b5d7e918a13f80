use serde::{Deserialize, Serialize};
use tracing::debug;
use twilio_core::FormData;

use super::Resource;
use crate::{Client, Error};

/// A message resource as returned by the Messages API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message SID (unique identifier).
    pub sid: String,
    pub account_sid: Option<String>,
    pub messaging_service_sid: Option<String>,
    pub to: Option<String>,
    pub from: Option<String>,
    pub body: Option<String>,
    /// Message status (e.g., `"queued"`, `"sent"`, `"delivered"`).
    pub status: Option<String>,
    /// `"inbound"`, `"outbound-api"`, `"outbound-call"` or `"outbound-reply"`.
    pub direction: Option<String>,
    pub num_segments: Option<String>,
    pub num_media: Option<String>,
    pub price: Option<String>,
    pub price_unit: Option<String>,
    /// Twilio error code (present on failed delivery).
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
    /// RFC 2822 timestamps, as sent by the API.
    pub date_created: Option<String>,
    pub date_sent: Option<String>,
    pub date_updated: Option<String>,
    pub uri: Option<String>,
}

/// One page of the Messages list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageList {
    #[serde(default)]
    pub messages: Vec<Message>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub uri: Option<String>,
    pub first_page_uri: Option<String>,
    pub next_page_uri: Option<String>,
    pub previous_page_uri: Option<String>,
}

impl Resource for Message {
    const COLLECTION: &'static str = "Messages";
    type List = MessageList;
}

/// Parameters for creating an outbound message.
#[derive(Debug, Clone, Default)]
pub struct SendMessage {
    to: String,
    from: Option<String>,
    messaging_service_sid: Option<String>,
    body: Option<String>,
    media_urls: Vec<String>,
    status_callback: Option<String>,
}

impl SendMessage {
    /// Start a message to the given destination (E.164 format).
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sender phone number. Falls back to the client's default when unset.
    #[must_use]
    pub fn sender(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Send through a messaging service instead of a fixed number.
    #[must_use]
    pub fn messaging_service_sid(mut self, sid: impl Into<String>) -> Self {
        self.messaging_service_sid = Some(sid.into());
        self
    }

    /// Attach a media URL (MMS). May be called more than once.
    #[must_use]
    pub fn media_url(mut self, url: impl Into<String>) -> Self {
        self.media_urls.push(url.into());
        self
    }

    #[must_use]
    pub fn status_callback(mut self, url: impl Into<String>) -> Self {
        self.status_callback = Some(url.into());
        self
    }

    /// Encode as API form fields, resolving the sender against
    /// `default_from`.
    pub fn into_form(self, default_from: Option<&str>) -> Result<FormData, Error> {
        if self.to.is_empty() {
            return Err(Error::Request("message must have a 'To' number".into()));
        }
        if self.body.is_none() && self.media_urls.is_empty() {
            return Err(Error::Request(
                "message must have a body or at least one media URL".into(),
            ));
        }

        let mut form = FormData::new().with("To", self.to);

        match (self.from, self.messaging_service_sid, default_from) {
            (Some(from), service, _) => {
                form.append("From", from);
                if let Some(sid) = service {
                    form.append("MessagingServiceSid", sid);
                }
            }
            (None, Some(sid), _) => form.append("MessagingServiceSid", sid),
            (None, None, Some(from)) => form.append("From", from),
            (None, None, None) => {
                return Err(Error::Request(
                    "no 'From' specified and no default sender configured".into(),
                ));
            }
        }

        if let Some(body) = self.body {
            form.append("Body", body);
        }
        for url in self.media_urls {
            form.append("MediaUrl", url);
        }
        if let Some(callback) = self.status_callback {
            form.append("StatusCallback", callback);
        }
        Ok(form)
    }
}

/// Handle for the Messages collection, returned by [`Client::messages`].
#[derive(Debug, Clone, Copy)]
pub struct Messages<'a> {
    client: &'a Client,
}

impl Client {
    pub fn messages(&self) -> Messages<'_> {
        Messages { client: self }
    }
}

impl Messages<'_> {
    /// Send a message.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> Result<(), twilio_client::Error> {
    /// use twilio_client::Client;
    /// use twilio_client::resources::SendMessage;
    ///
    /// let client = Client::new("ACXXXXXXXX", "auth_token");
    /// let message = client
    ///     .messages()
    ///     .send(SendMessage::new("+15559876543").sender("+15551234567").body("Hello!"))
    ///     .await?;
    /// println!("{} is {:?}", message.sid, message.status);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send(&self, message: SendMessage) -> Result<Message, Error> {
        let form = message.into_form(self.client.default_from())?;
        let sent: Message = self.client.create(&form).await?;
        debug!(sid = %sent.sid, status = ?sent.status, "message created");
        Ok(sent)
    }

    pub async fn fetch(&self, sid: &str) -> Result<Message, Error> {
        self.client.fetch(sid).await
    }

    pub async fn update(&self, sid: &str, data: &FormData) -> Result<Message, Error> {
        self.client.update(sid, data).await
    }

    /// Blank out the body of a sent message.
    pub async fn redact(&self, sid: &str) -> Result<Message, Error> {
        self.update(sid, &FormData::new().with("Body", "")).await
    }

    pub async fn list(&self, params: &FormData) -> Result<MessageList, Error> {
        self.client.list::<Message>(params).await
    }
}
