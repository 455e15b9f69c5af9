use portfolio_models::contact::{ContactMessage, ContactMessageError};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiContactMessage {
    /// Full name of the sender
    pub username: Option<String>,
    /// Email address of the sender
    pub email: Option<String>,
    /// Content of the message
    pub message: Option<String>,
}

impl ApiContactMessage {
    /// Decodes a request body. Bodies that are not a json object with string
    /// fields carry no usable field at all.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body)
            .inspect_err(|err| debug!("failed to decode contact message: {err}"))
            .unwrap_or_default()
    }
}

impl TryFrom<ApiContactMessage> for ContactMessage {
    type Error = ContactMessageError;

    fn try_from(value: ApiContactMessage) -> Result<Self, Self::Error> {
        ContactMessage::parse(value.username, value.email, value.message)
    }
}
