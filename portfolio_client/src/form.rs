use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::warn;

use crate::{ContactApiService, ContactRequest, ContactResponse};

/// Shown when the relay endpoint could not be reached or answered garbage.
pub const NETWORK_ERROR: &str = "Network error. Please try again.";

/// Shown when the relay endpoint reported a failure without a reason.
pub const FALLBACK_ERROR: &str = "Failed to send message";

/// State of a contact form: the three input fields and the outcome of the
/// last submission.
///
/// At most one submission is in flight at any time, further submissions are
/// refused until it completes or is cancelled.
#[derive(Debug)]
pub struct ContactForm<Api> {
    api: Api,
    state: Mutex<State>,
    sending: AtomicBool,
}

#[derive(Debug, Default)]
struct State {
    fields: ContactFormFields,
    status: ContactFormStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Marks a submission as in flight until dropped.
struct SendingGuard<'a>(&'a AtomicBool);

impl<'a> SendingGuard<'a> {
    fn acquire(sending: &'a AtomicBool) -> Option<Self> {
        sending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then_some(Self(sending))
    }
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContactFormStatus {
    #[default]
    Idle,
    Sending,
    Sent,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResult {
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactFormSubmitError {
    #[error("All fields are required")]
    MissingFields,
    #[error("A message is already being sent")]
    InFlight,
}

impl ContactFormFields {
    fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.email.is_empty() && !self.message.is_empty()
    }
}

impl ContactFormStatus {
    /// Text of the status banner below the form, if any.
    pub fn banner(&self) -> Option<String> {
        match self {
            Self::Idle | Self::Sending => None,
            Self::Sent => Some("Message sent successfully!".into()),
            Self::Failed(error) => Some(format!("Error: {error}")),
        }
    }

    /// Label of the submit button.
    pub fn button_label(&self) -> &'static str {
        match self {
            Self::Sending => "Sending...",
            _ => "Send Message",
        }
    }
}

impl<Api> ContactForm<Api>
where
    Api: ContactApiService,
{
    pub fn new(api: Api) -> Self {
        Self {
            api,
            state: Default::default(),
            sending: AtomicBool::new(false),
        }
    }

    pub async fn fields(&self) -> ContactFormFields {
        self.state.lock().await.fields.clone()
    }

    pub async fn status(&self) -> ContactFormStatus {
        if self.sending.load(Ordering::Acquire) {
            return ContactFormStatus::Sending;
        }
        self.state.lock().await.status.clone()
    }

    /// Applies user input to the form fields.
    pub async fn edit(&self, f: impl FnOnce(&mut ContactFormFields)) {
        f(&mut self.state.lock().await.fields);
    }

    /// Submits the current fields to the relay endpoint.
    ///
    /// On success the fields are cleared, otherwise they keep their values and
    /// the status carries the error to display. Dropping the returned future
    /// before it completes leaves fields and status untouched.
    pub async fn submit(&self) -> Result<SubmitResult, ContactFormSubmitError> {
        let _sending =
            SendingGuard::acquire(&self.sending).ok_or(ContactFormSubmitError::InFlight)?;

        let request = {
            let state = self.state.lock().await;
            if !state.fields.is_complete() {
                return Err(ContactFormSubmitError::MissingFields);
            }

            ContactRequest {
                username: state.fields.name.clone(),
                email: state.fields.email.clone(),
                message: state.fields.message.clone(),
            }
        };

        let result = match self.api.send_message(request).await {
            Ok(ContactResponse { success: true, .. }) => SubmitResult {
                success: true,
                error: None,
            },
            Ok(ContactResponse { error, .. }) => SubmitResult {
                success: false,
                error: Some(error.unwrap_or_else(|| FALLBACK_ERROR.into())),
            },
            Err(err) => {
                warn!("Failed to reach contact endpoint: {err:#}");
                SubmitResult {
                    success: false,
                    error: Some(NETWORK_ERROR.into()),
                }
            }
        };

        let mut state = self.state.lock().await;
        match &result.error {
            None => {
                state.fields = ContactFormFields::default();
                state.status = ContactFormStatus::Sent;
            }
            Some(error) => state.status = ContactFormStatus::Failed(error.clone()),
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use anyhow::anyhow;
    use pretty_assertions::assert_eq;
    use tokio::sync::oneshot;

    use super::*;
    use crate::MockContactApiService;

    fn filled() -> ContactFormFields {
        ContactFormFields {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            message: "Hi".into(),
        }
    }

    fn request() -> ContactRequest {
        ContactRequest {
            username: "Alice".into(),
            email: "alice@example.com".into(),
            message: "Hi".into(),
        }
    }

    fn response(success: bool, error: Option<&str>) -> ContactResponse {
        ContactResponse {
            success,
            message: success.then(|| "Email sent successfully!".into()),
            error: error.map(Into::into),
        }
    }

    fn api(result: anyhow::Result<ContactResponse>) -> MockContactApiService {
        let mut api = MockContactApiService::new();
        api.expect_send_message()
            .once()
            .with(mockall::predicate::eq(request()))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        api
    }

    async fn make_sut(api: MockContactApiService) -> ContactForm<MockContactApiService> {
        let sut = ContactForm::new(api);
        sut.edit(|fields| *fields = filled()).await;
        sut
    }

    #[tokio::test]
    async fn sent() {
        // Arrange
        let sut = make_sut(api(Ok(response(true, None)))).await;

        // Act
        let result = sut.submit().await;

        // Assert
        assert_eq!(
            result,
            Ok(SubmitResult {
                success: true,
                error: None
            })
        );
        assert_eq!(sut.fields().await, ContactFormFields::default());
        assert_eq!(sut.status().await, ContactFormStatus::Sent);
        assert_eq!(
            sut.status().await.banner().as_deref(),
            Some("Message sent successfully!")
        );
    }

    #[tokio::test]
    async fn rejected_by_server() {
        // Arrange
        let sut = make_sut(api(Ok(response(false, Some("Invalid email address"))))).await;

        // Act
        let result = sut.submit().await;

        // Assert
        assert_eq!(
            result,
            Ok(SubmitResult {
                success: false,
                error: Some("Invalid email address".into())
            })
        );
        assert_eq!(sut.fields().await, filled());
        assert_eq!(
            sut.status().await,
            ContactFormStatus::Failed("Invalid email address".into())
        );
        assert_eq!(
            sut.status().await.banner().as_deref(),
            Some("Error: Invalid email address")
        );
    }

    #[tokio::test]
    async fn rejected_without_reason() {
        // Arrange
        let sut = make_sut(api(Ok(response(false, None)))).await;

        // Act
        let result = sut.submit().await.unwrap();

        // Assert
        assert_eq!(result.error.as_deref(), Some(FALLBACK_ERROR));
        assert_eq!(sut.fields().await, filled());
    }

    #[tokio::test]
    async fn network_error() {
        // Arrange
        let sut = make_sut(api(Err(anyhow!("connection refused")))).await;

        // Act
        let result = sut.submit().await;

        // Assert
        assert_eq!(
            result,
            Ok(SubmitResult {
                success: false,
                error: Some(NETWORK_ERROR.into())
            })
        );
        assert_eq!(sut.fields().await, filled());
        assert_eq!(
            sut.status().await,
            ContactFormStatus::Failed(NETWORK_ERROR.into())
        );
    }

    #[tokio::test]
    async fn missing_fields() {
        for clear in [
            (|fields: &mut ContactFormFields| fields.name.clear()) as fn(&mut ContactFormFields),
            |fields| fields.email.clear(),
            |fields| fields.message.clear(),
        ] {
            // Arrange
            let sut = make_sut(MockContactApiService::new()).await;
            sut.edit(clear).await;

            // Act
            let result = sut.submit().await;

            // Assert
            assert_eq!(result, Err(ContactFormSubmitError::MissingFields));
            assert_eq!(sut.status().await, ContactFormStatus::Idle);
        }
    }

    #[tokio::test]
    async fn one_submission_in_flight() {
        // Arrange
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let mut api = MockContactApiService::new();
        api.expect_send_message().once().return_once(move |_| {
            started_tx.send(()).unwrap();
            Box::pin(async move {
                release_rx.await.unwrap();
                Ok::<_, anyhow::Error>(response(true, None))
            })
        });

        let sut = Arc::new(make_sut(api).await);

        // Act
        let first = tokio::spawn({
            let sut = Arc::clone(&sut);
            async move { sut.submit().await }
        });
        started_rx.await.unwrap();

        let status = sut.status().await;
        let second = sut.submit().await;

        release_tx.send(()).unwrap();
        let first = first.await.unwrap();

        // Assert
        assert_eq!(status, ContactFormStatus::Sending);
        assert_eq!(status.button_label(), "Sending...");
        assert_eq!(second, Err(ContactFormSubmitError::InFlight));
        assert_eq!(
            first,
            Ok(SubmitResult {
                success: true,
                error: None
            })
        );
        assert_eq!(sut.status().await.button_label(), "Send Message");
    }

    #[tokio::test]
    async fn resubmit_after_cancelled_submission() {
        // Arrange
        let mut api = MockContactApiService::new();
        let mut seq = mockall::Sequence::new();
        api.expect_send_message()
            .once()
            .in_sequence(&mut seq)
            .return_once(|_| Box::pin(std::future::pending::<anyhow::Result<ContactResponse>>()));
        api.expect_send_message()
            .once()
            .in_sequence(&mut seq)
            .with(mockall::predicate::eq(request()))
            .return_once(|_| Box::pin(std::future::ready(Ok::<_, anyhow::Error>(response(true, None)))));

        let sut = make_sut(api).await;

        // Act
        let cancelled = tokio::time::timeout(Duration::from_millis(50), sut.submit()).await;
        let status = sut.status().await;
        let fields = sut.fields().await;
        let resubmitted = sut.submit().await;

        // Assert
        cancelled.unwrap_err();
        assert_eq!(status, ContactFormStatus::Idle);
        assert_eq!(status.button_label(), "Send Message");
        assert_eq!(fields, filled());
        assert_eq!(
            resubmitted,
            Ok(SubmitResult {
                success: true,
                error: None
            })
        );
        assert_eq!(sut.status().await, ContactFormStatus::Sent);
    }

    #[tokio::test]
    async fn resubmit_after_failure() {
        // Arrange
        let mut api = MockContactApiService::new();
        let mut seq = mockall::Sequence::new();
        api.expect_send_message()
            .once()
            .in_sequence(&mut seq)
            .return_once(|_| Box::pin(std::future::ready(Err::<ContactResponse, _>(anyhow!("timed out")))));
        api.expect_send_message()
            .once()
            .in_sequence(&mut seq)
            .return_once(|_| Box::pin(std::future::ready(Ok::<_, anyhow::Error>(response(true, None)))));

        let sut = make_sut(api).await;

        // Act
        let first = sut.submit().await.unwrap();
        let second = sut.submit().await.unwrap();

        // Assert
        assert!(!first.success);
        assert!(second.success);
        assert_eq!(sut.fields().await, ContactFormFields::default());
    }
}
