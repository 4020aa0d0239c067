use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    http::{header, Method},
    Router,
};
use formrelay_core_contact_contracts::ContactService;
use formrelay_core_health_contracts::HealthService;
use formrelay_di::Build;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

mod middlewares;
mod models;
mod routes;

pub use middlewares::client_ip::ClientIp;

#[derive(Debug, Clone, Build)]
pub struct RestServer<Health, Contact> {
    health: Health,
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub real_ip_config: Option<Arc<RestServerRealIpConfig>>,
}

/// Trust settings for client IP extraction behind a reverse proxy.
#[derive(Debug)]
pub struct RestServerRealIpConfig {
    /// Header carrying the real client IP.
    pub header: String,
    /// The header is only honored if the direct peer is this address.
    pub set_from: IpAddr,
}

impl<Health, Contact> RestServer<Health, Contact>
where
    Health: HealthService,
    Contact: ContactService,
{
    pub fn new(health: Health, contact: Contact, config: RestServerConfig) -> Self {
        Self {
            health,
            contact,
            config,
        }
    }

    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let router = self.router();
        let listener = TcpListener::bind((host, port)).await?;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .map_err(Into::into)
    }

    /// Builds the complete router including all middlewares.
    ///
    /// Every response carries the permissive CORS headers, including error
    /// responses and the 404 fallback.
    pub fn router(self) -> Router<()> {
        let real_ip_config = self.config.real_ip_config.clone();

        let router = Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(self.contact.into()))
            .fallback(routes::not_found);

        let router = middlewares::trace::add(router);
        let router = middlewares::request_id::add(router);
        let router = middlewares::client_ip::add(real_ip_config)(router);
        let router = middlewares::panic_handler::add(router);

        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
    }
}
