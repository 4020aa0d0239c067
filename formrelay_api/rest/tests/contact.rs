use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Method, Request, StatusCode},
    Router,
};
use formrelay_api_rest::{RestServer, RestServerConfig, RestServerRealIpConfig};
use formrelay_core_contact_contracts::{ContactSubmitError, MockContactService};
use formrelay_core_health_contracts::MockHealthService;
use formrelay_models::contact::{ContactRequest, ContactValidationError};
use http_body_util::BodyExt;
use tower::ServiceExt;

const CLIENT_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4));

fn router(contact: MockContactService) -> Router<()> {
    RestServer::new(
        MockHealthService::new(),
        contact,
        RestServerConfig {
            real_ip_config: None,
        },
    )
    .router()
}

fn request_payload() -> ContactRequest {
    ContactRequest {
        name: Some("Jo Doe".into()),
        email: "jo@example.com".into(),
        message: "1234567890".into(),
        ..Default::default()
    }
}

fn post(payload: &ContactRequest, client_ip: IpAddr) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .extension(ConnectInfo(SocketAddr::new(client_ip, 54321)))
        .body(Body::from(serde_json::to_string(payload).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn submit_ok() {
    let contact = MockContactService::new().with_submit(CLIENT_IP, request_payload(), Ok(()));
    let router = router(contact);

    let response = router.oneshot(post(&request_payload(), CLIENT_IP)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"success": true, "message": "Message sent successfully!"})
    );
}

#[tokio::test]
async fn submit_validation_error() {
    let contact = MockContactService::new().with_submit(
        CLIENT_IP,
        request_payload(),
        Err(ContactSubmitError::Validation(
            ContactValidationError::Message,
        )),
    );
    let router = router(contact);

    let response = router.oneshot(post(&request_payload(), CLIENT_IP)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({
            "success": false,
            "error": "Message must be at least 10 characters long."
        })
    );
}

#[tokio::test]
async fn submit_rate_limited() {
    let contact = MockContactService::new().with_submit(
        CLIENT_IP,
        request_payload(),
        Err(ContactSubmitError::RateLimited),
    );
    let router = router(contact);

    let response = router.oneshot(post(&request_payload(), CLIENT_IP)).await.unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
    assert_eq!(
        body_json(response).await,
        serde_json::json!({
            "success": false,
            "error": "Too many requests. Please try again later."
        })
    );
}

#[tokio::test]
async fn submit_upstream_error() {
    let contact = MockContactService::new().with_submit(
        CLIENT_IP,
        request_payload(),
        Err(ContactSubmitError::Other(anyhow::anyhow!(
            "mail API returned 503: upstream exploded"
        ))),
    );
    let router = router(contact);

    let response = router.oneshot(post(&request_payload(), CLIENT_IP)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"success": false, "error": "Failed to send message."})
    );
}

#[tokio::test]
async fn submit_uses_real_ip_header_from_trusted_proxy() {
    let proxy_ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));

    let contact = MockContactService::new().with_submit(CLIENT_IP, request_payload(), Ok(()));
    let router = RestServer::new(
        MockHealthService::new(),
        contact,
        RestServerConfig {
            real_ip_config: Some(Arc::new(RestServerRealIpConfig {
                header: "X-Real-Ip".into(),
                set_from: proxy_ip,
            })),
        },
    )
    .router();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-Real-Ip", "1.2.3.4")
        .extension(ConnectInfo(SocketAddr::new(proxy_ip, 54321)))
        .body(Body::from(
            serde_json::to_string(&request_payload()).unwrap(),
        ))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn preflight() {
    let router = router(MockContactService::new());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/contact")
        .header(header::ORIGIN, "https://formrelay.dev")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .extension(ConnectInfo(SocketAddr::new(CLIENT_IP, 54321)))
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    assert!(headers
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap()
        .contains("POST"));
    assert!(headers
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_ascii_lowercase()
        .contains("content-type"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn bare_options() {
    let router = router(MockContactService::new());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/contact")
        .extension(ConnectInfo(SocketAddr::new(CLIENT_IP, 54321)))
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn unknown_route() {
    let router = router(MockContactService::new());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/unknown")
        .extension(ConnectInfo(SocketAddr::new(CLIENT_IP, 54321)))
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&*bytes, b"Not Found");
}
