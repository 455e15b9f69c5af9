use std::sync::Arc;

use anyhow::Context;
use portfolio_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use portfolio_email_contracts::{Email, EmailService};
use portfolio_models::{
    contact::{ContactMessage, ContactMessageAuthor},
    email_address::{EmailAddress, EmailAddressWithName},
};
use tracing::info;

#[derive(Debug, Clone)]
pub struct ContactFeatureServiceImpl<Email> {
    email: Email,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Address of the site owner. Without it every message fails to send.
    pub recipient: Option<Arc<EmailAddressWithName>>,
}

impl<EmailS> ContactFeatureServiceImpl<EmailS> {
    pub fn new(email: EmailS, config: ContactFeatureConfig) -> Self {
        Self { email, config }
    }
}

impl<EmailS> ContactFeatureService for ContactFeatureServiceImpl<EmailS>
where
    EmailS: EmailService,
{
    async fn send_message(&self, message: ContactMessage) -> Result<(), ContactSendMessageError> {
        let recipient = self
            .config
            .recipient
            .as_deref()
            .cloned()
            .context("No contact recipient configured")?;

        let ContactMessage {
            author: ContactMessageAuthor { name, email },
            content,
        } = message;
        let (name, email, content) = (name.into_inner(), email.into_inner(), content.into_inner());

        let sender = email
            .parse::<EmailAddress>()
            .with_context(|| format!("Cannot use {email:?} as sender address"))?
            .with_name(name.clone());

        let mail = Email {
            sender: sender.clone(),
            recipient,
            subject: format!("Portfolio Contact from {name}"),
            body: format!("Name: {name}\nEmail: {email}\nMessage: {content}"),
            reply_to: Some(sender),
        };

        if !self.email.send(mail).await? {
            return Err(ContactSendMessageError::Send);
        }

        info!("Relayed contact message");

        Ok(())
    }
}
