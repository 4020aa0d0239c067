//! Stub implementation of the Graph-style mail API, including the OAuth2
//! client-credentials token endpoint.

use std::{
    collections::HashSet,
    net::IpAddr,
    sync::{Arc, Mutex},
};

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing, Form, Json, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::info;
use uuid::Uuid;

pub async fn start_server(
    host: IpAddr,
    port: u16,
    client_id: String,
    client_secret: String,
) -> anyhow::Result<()> {
    info!("Starting mail API testing server on {host}:{port}");
    info!("Token endpoint: http://{host}:{port}/<tenant>/oauth2/v2.0/token");
    info!("Send endpoint: http://{host}:{port}/v1.0/users/<sender>/sendMail");
    info!("Client id: {client_id:?}, client secret: {client_secret:?}");

    let state = MailStubState::new(client_id, client_secret);
    let router = router(state);

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router)
        .await
        .context("Failed to start HTTP server")
}

pub fn router(state: MailStubState) -> Router<()> {
    Router::new()
        .route("/:tenant/oauth2/v2.0/token", routing::post(token))
        .route("/v1.0/users/:sender/sendMail", routing::post(send_mail))
        .with_state(state)
}

#[derive(Debug, Clone)]
pub struct MailStubState {
    client_id: String,
    client_secret: String,
    tokens: Arc<Mutex<HashSet<String>>>,
    outbox: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl MailStubState {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
            tokens: Arc::default(),
            outbox: Arc::default(),
        }
    }

    /// Messages accepted by the sendMail endpoint, oldest first.
    pub fn outbox(&self) -> Vec<serde_json::Value> {
        self.outbox.lock().unwrap().clone()
    }
}

#[derive(Deserialize)]
struct TokenRequest {
    grant_type: String,
    client_id: String,
    client_secret: String,
    #[allow(dead_code)]
    #[serde(default)]
    scope: String,
}

async fn token(
    State(state): State<MailStubState>,
    Form(request): Form<TokenRequest>,
) -> Response {
    if request.grant_type != "client_credentials"
        || request.client_id != state.client_id
        || request.client_secret != state.client_secret
    {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "invalid_client"})),
        )
            .into_response();
    }

    let token = Uuid::new_v4().to_string();
    state.tokens.lock().unwrap().insert(token.clone());

    Json(serde_json::json!({
        "access_token": token,
        "token_type": "bearer",
        "expires_in": 3599,
    }))
    .into_response()
}

async fn send_mail(
    State(state): State<MailStubState>,
    Path(_sender): Path<String>,
    headers: HeaderMap,
    Json(message): Json<serde_json::Value>,
) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|x| x.to_str().ok())
        .and_then(|x| x.strip_prefix("Bearer "))
        .is_some_and(|x| state.tokens.lock().unwrap().contains(x));

    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": {"code": "InvalidAuthenticationToken"}})),
        )
            .into_response();
    }

    state.outbox.lock().unwrap().push(message);

    StatusCode::ACCEPTED.into_response()
}
