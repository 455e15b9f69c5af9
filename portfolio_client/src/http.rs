use std::sync::{Arc, LazyLock};

use anyhow::Context;
use portfolio_utils::portfolio_version;
use url::Url;

use crate::{ContactApiService, ContactRequest, ContactResponse};

pub static USER_AGENT: LazyLock<String> =
    LazyLock::new(|| format!("Portfolio Contact Client (Version {})", portfolio_version()));

const SENDMAIL_PATH: &str = "api/sendmail";

#[derive(Debug, Clone)]
pub struct HttpContactApiService {
    client: reqwest::Client,
    endpoint: Arc<Url>,
}

impl HttpContactApiService {
    /// Creates a client for the relay served at `base_url`.
    ///
    /// The endpoint is resolved relative to the full base path, so
    /// `https://example.com/portfolio` posts to
    /// `https://example.com/portfolio/api/sendmail`.
    pub fn new(base_url: &Url) -> anyhow::Result<Self> {
        let mut base_url = base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let endpoint = base_url
            .join(SENDMAIL_PATH)
            .with_context(|| format!("Invalid relay url {base_url}"))?;

        let client = reqwest::Client::builder()
            .user_agent(&*USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl ContactApiService for HttpContactApiService {
    async fn send_message(&self, request: ContactRequest) -> anyhow::Result<ContactResponse> {
        // Failures are reported with a 4xx/5xx status and a json body.
        self.client
            .post((*self.endpoint).clone())
            .json(&request)
            .send()
            .await?
            .json::<ContactResponse>()
            .await
            .map_err(Into::into)
    }
}
