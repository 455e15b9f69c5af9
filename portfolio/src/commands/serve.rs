use portfolio_config::Config;
use portfolio_email_contracts::EmailService;
use tracing::{info, warn};

use crate::{email, environment};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Connecting to smtp server");
    let email = email::connect(&config.email)?;
    if let Err(err) = email.ping().await {
        warn!("Smtp server is not reachable, contact messages will fail: {err:#}");
    }

    if config.contact_recipient().is_none() {
        warn!("No contact recipient configured, contact messages will fail");
    }

    let server = environment::rest_server(&config, email);
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve().await
}
