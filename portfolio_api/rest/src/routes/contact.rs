use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use portfolio_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use portfolio_models::contact::{ContactMessage, ContactMessageError};
use tracing::error;

use super::error;
use crate::models::{contact::ApiContactMessage, ApiSuccess};

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route("/api/sendmail", routing::post(send_message))
        .with_state(service)
}

async fn send_message(service: State<Arc<impl ContactFeatureService>>, body: Bytes) -> Response {
    let message = match ContactMessage::try_from(ApiContactMessage::from_body(&body)) {
        Ok(message) => message,
        Err(ContactMessageError::MissingFields) => {
            return error(StatusCode::BAD_REQUEST, "All fields are required")
        }
        Err(ContactMessageError::InvalidEmail) => {
            return error(StatusCode::BAD_REQUEST, "Invalid email address")
        }
    };

    match service.send_message(message).await {
        Ok(()) => Json(ApiSuccess::new("Email sent successfully!")).into_response(),
        Err(err) => {
            match err {
                ContactSendMessageError::Send => {
                    error!("Send Error: smtp server did not accept the message")
                }
                ContactSendMessageError::Other(err) => error!("Send Error: {err:#}"),
            }
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send email")
        }
    }
}
