use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ApiFailure;

pub mod contact;
pub mod health;

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send message.")
}

pub fn error(code: StatusCode, error: impl Into<String>) -> Response {
    (code, Json(ApiFailure::new(error))).into_response()
}

/// Unknown routes return a plain text 404; bare OPTIONS requests (without
/// preflight headers, which the CORS layer answers itself) succeed with an
/// empty body.
pub async fn not_found(method: Method) -> Response {
    if method == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        (StatusCode::NOT_FOUND, "Not Found").into_response()
    }
}
