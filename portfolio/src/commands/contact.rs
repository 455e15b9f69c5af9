use anyhow::{bail, ensure};
use clap::Subcommand;
use portfolio_client::{form::ContactForm, http::HttpContactApiService};
use url::Url;

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Submit a message through a running relay, like the contact form does
    Send {
        /// Base url of the relay
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        endpoint: Url,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
}

impl ContactCommand {
    pub async fn invoke(self) -> anyhow::Result<()> {
        match self {
            ContactCommand::Send {
                endpoint,
                name,
                email,
                message,
            } => send(endpoint, name, email, message).await,
        }
    }
}

async fn send(endpoint: Url, name: String, email: String, message: String) -> anyhow::Result<()> {
    let form = ContactForm::new(HttpContactApiService::new(&endpoint)?);
    form.edit(|fields| {
        fields.name = name;
        fields.email = email;
        fields.message = message;
    })
    .await;

    let result = form.submit().await?;

    let Some(banner) = form.status().await.banner() else {
        bail!("Contact form did not settle");
    };
    println!("{banner}");

    ensure!(result.success, "Message was not sent");

    Ok(())
}
