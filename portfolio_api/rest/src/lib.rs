use std::net::IpAddr;

use anyhow::Context;
use axum::Router;
use portfolio_core_contact_contracts::ContactFeatureService;
use portfolio_core_health_contracts::HealthFeatureService;
use tokio::net::TcpListener;

mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Health, Contact> {
    health: Health,
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Origins allowed to post the contact form from a browser.
    pub allowed_origins: Vec<String>,
}

impl<Health, Contact> RestServer<Health, Contact>
where
    Health: HealthFeatureService,
    Contact: ContactFeatureService,
{
    pub fn new(health: Health, contact: Contact, config: RestServerConfig) -> Self {
        Self {
            health,
            contact,
            config,
        }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let (host, port) = (self.config.host, self.config.port);
        let router = self.router()?;
        let listener = TcpListener::bind((host, port))
            .await
            .with_context(|| format!("Failed to bind to {host}:{port}"))?;
        axum::serve(listener, router).await.map_err(Into::into)
    }

    fn router(self) -> anyhow::Result<Router<()>> {
        let router = Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(self.contact.into()));

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        let router = middlewares::request_id::add(router);
        middlewares::cors::add(router, &self.config.allowed_origins)
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use portfolio_core_contact_contracts::MockContactFeatureService;
    use portfolio_core_health_contracts::{HealthStatus, MockHealthFeatureService};
    use tower::ServiceExt;

    use super::*;
    use crate::middlewares::request_id::REQUEST_ID_HEADER;

    type Sut = RestServer<MockHealthFeatureService, MockContactFeatureService>;

    fn make_sut(health: MockHealthFeatureService, allowed_origins: &[&str]) -> Sut {
        RestServer::new(
            health,
            MockContactFeatureService::new(),
            RestServerConfig {
                host: [127, 0, 0, 1].into(),
                port: 0,
                allowed_origins: allowed_origins.iter().map(|&x| x.into()).collect(),
            },
        )
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/sendmail")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn request_id() {
        let health = MockHealthFeatureService::new().with_get_status(HealthStatus { email: true });
        let router = make_sut(health, &[]).router().unwrap();

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let request_id = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(!request_id.is_empty());
    }

    #[tokio::test]
    async fn unknown_route() {
        let router = make_sut(MockHealthFeatureService::new(), &[])
            .router()
            .unwrap();

        let response = router
            .oneshot(Request::get("/api/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_allowed_origin() {
        let router = make_sut(
            MockHealthFeatureService::new(),
            &["https://portfolio.example.com"],
        )
        .router()
        .unwrap();

        let response = router
            .oneshot(preflight("https://portfolio.example.com"))
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&"https://portfolio.example.com".parse().unwrap())
        );
    }

    #[tokio::test]
    async fn cors_foreign_origin() {
        let router = make_sut(
            MockHealthFeatureService::new(),
            &["https://portfolio.example.com"],
        )
        .router()
        .unwrap();

        let response = router
            .oneshot(preflight("https://evil.example.com"))
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            None
        );
    }

    #[tokio::test]
    async fn cors_any_origin() {
        let router = make_sut(MockHealthFeatureService::new(), &["*"])
            .router()
            .unwrap();

        let response = router
            .oneshot(preflight("https://anywhere.example.com"))
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&"*".parse().unwrap())
        );
    }

    #[test]
    fn invalid_origin() {
        make_sut(MockHealthFeatureService::new(), &["https://bad\norigin"])
            .router()
            .unwrap_err();
    }
}
