//! Stub implementation of the Turnstile siteverify endpoint.

use std::net::IpAddr;

use anyhow::Context;
use axum::{extract::State, routing, Form, Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

const SITEVERIFY_ROUTE: &str = "/turnstile/v0/siteverify";

pub async fn start_server(host: IpAddr, port: u16, secret: String) -> anyhow::Result<()> {
    info!("Starting turnstile testing server on {host}:{port}");
    info!("Siteverify endpoint: http://{host}:{port}{SITEVERIFY_ROUTE}");
    info!("Secret: {secret:?}");
    info!("The only valid challenge response is \"success\"");

    let router = router(secret);

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router)
        .await
        .context("Failed to start HTTP server")
}

pub fn router(secret: String) -> Router<()> {
    Router::new()
        .route(SITEVERIFY_ROUTE, routing::post(siteverify))
        .with_state(secret.into())
}

#[derive(Deserialize)]
struct SiteverifyRequest {
    secret: String,
    response: String,
}

#[derive(Serialize)]
struct SiteverifyResponse {
    success: bool,
    #[serde(rename = "error-codes", skip_serializing_if = "Vec::is_empty")]
    error_codes: Vec<&'static str>,
}

async fn siteverify(
    State(secret): State<std::sync::Arc<str>>,
    Form(request): Form<SiteverifyRequest>,
) -> Json<SiteverifyResponse> {
    if request.secret != *secret {
        return Json(SiteverifyResponse {
            success: false,
            error_codes: vec!["invalid-input-secret"],
        });
    }

    if request.response != "success" {
        return Json(SiteverifyResponse {
            success: false,
            error_codes: vec!["invalid-input-response"],
        });
    }

    Json(SiteverifyResponse {
        success: true,
        error_codes: Vec::new(),
    })
}
