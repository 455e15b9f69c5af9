use std::sync::Arc;

use portfolio_api_rest::RestServerConfig;
use portfolio_config::Config;
use portfolio_core_contact_impl::{ContactFeatureConfig, ContactFeatureServiceImpl};
use portfolio_core_health_impl::HealthFeatureServiceImpl;
use types::{Email, RestServer};

pub mod types;

/// Wires the services of the relay together.
pub fn rest_server(config: &Config, email: Email) -> RestServer {
    let rest_server_config = RestServerConfig {
        host: config.http.host,
        port: config.http.port,
        allowed_origins: config.http.allowed_origins.clone(),
    };

    let contact_feature_config = ContactFeatureConfig {
        recipient: config.contact_recipient().map(Arc::new),
    };

    RestServer::new(
        HealthFeatureServiceImpl::new(email.clone()),
        ContactFeatureServiceImpl::new(email, contact_feature_config),
        rest_server_config,
    )
}
