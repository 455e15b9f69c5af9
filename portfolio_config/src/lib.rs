use std::{collections::HashMap, net::IpAddr, path::Path};

use anyhow::Context;
use config::{Environment, File, FileFormat};
use portfolio_models::email_address::EmailAddressWithName;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Colon separated list of config files, later files take precedence.
pub const CONFIG_PATHS_ENV: &str = "PORTFOLIO_CONFIG";

/// Loads the config files named by `PORTFOLIO_CONFIG` (or the default config)
/// and applies overrides from the process environment.
pub fn load() -> anyhow::Result<Config> {
    let paths = match std::env::var(CONFIG_PATHS_ENV) {
        Ok(paths) => paths
            .split(':')
            .filter(|path| !path.is_empty())
            .map(Into::into)
            .collect(),
        Err(_) => vec![DEFAULT_CONFIG_PATH.to_owned()],
    };

    load_from(&paths, std::env::vars().collect())
}

/// Loads the given config files and applies overrides from `env`:
///
/// - `PORTFOLIO__SECTION__KEY` overrides `section.key`
/// - `EMAIL_USER` and `EMAIL_PASSWORD` set the mail provider account
pub fn load_from(
    paths: &[impl AsRef<Path>],
    env: HashMap<String, String>,
) -> anyhow::Result<Config> {
    let builder = paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .set_override_option("email.username", env.get("EMAIL_USER").cloned())?
        .set_override_option("email.password", env.get("EMAIL_PASSWORD").cloned())?;

    builder
        .add_source(
            Environment::with_prefix("PORTFOLIO")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("http.allowed_origins")
                .try_parsing(true)
                .source(Some(env)),
        )
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    #[serde(default)]
    pub contact: ContactConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Deserialize)]
pub struct EmailConfig {
    pub smtp_url: String,
    pub from: EmailAddressWithName,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactConfig {
    pub recipient: Option<EmailAddressWithName>,
}

impl Config {
    /// The configured contact recipient, falling back to the mail provider
    /// account if that is a valid email address.
    pub fn contact_recipient(&self) -> Option<EmailAddressWithName> {
        self.contact.recipient.clone().or_else(|| {
            self.email
                .username
                .as_deref()
                .and_then(|username| username.parse().ok())
        })
    }
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_url", &self.smtp_url)
            .field("from", &self.from)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
