use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Extension, Json, Router,
};
use formrelay_core_contact_contracts::{ContactService, ContactSubmitError};
use formrelay_models::contact::ContactRequest;

use super::{error, internal_server_error};
use crate::{middlewares::client_ip::ClientIp, models::ApiSuccess};

pub fn router(service: Arc<impl ContactService>) -> Router<()> {
    Router::new()
        .route(
            "/api/contact",
            routing::post(submit).options(|| async { StatusCode::OK }),
        )
        .with_state(service)
}

async fn submit(
    service: State<Arc<impl ContactService>>,
    Extension(client_ip): Extension<ClientIp>,
    Json(request): Json<ContactRequest>,
) -> Response {
    match service.submit(client_ip.0, request).await {
        Ok(()) => Json(ApiSuccess::new("Message sent successfully!")).into_response(),
        Err(ContactSubmitError::RateLimited) => error(
            StatusCode::TOO_MANY_REQUESTS,
            ContactSubmitError::RateLimited.to_string(),
        ),
        // All handled failures report as 500, only the rate limit is
        // distinguishable for clients.
        Err(err @ (ContactSubmitError::Validation(_) | ContactSubmitError::Captcha)) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        Err(ContactSubmitError::Other(err)) => internal_server_error(err),
    }
}
