//! Client side of the contact form: the form state and the single request it
//! sends to the relay endpoint.

use std::future::Future;

use serde::{Deserialize, Serialize};

pub mod form;
pub mod http;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait ContactApiService: Send + Sync + 'static {
    /// Posts a contact message to the relay endpoint.
    ///
    /// Responses of the endpoint are returned as they are, including the ones
    /// reporting a failure. `Err(...)` means no well-formed response arrived.
    fn send_message(
        &self,
        request: ContactRequest,
    ) -> impl Future<Output = anyhow::Result<ContactResponse>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRequest {
    pub username: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
