use anyhow::Context;
use portfolio_config::EmailConfig;
use portfolio_email_impl::{EmailServiceImpl, SmtpCredentials};

/// Configure the SMTP transport. Without a username the server is used
/// unauthenticated.
pub fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    let credentials = config.username.clone().map(|username| SmtpCredentials {
        username,
        password: config.password.clone().unwrap_or_default(),
    });

    EmailServiceImpl::new(&config.smtp_url, credentials)
        .context("Failed to configure smtp transport")
}
