use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{http::StatusCode, response::IntoResponse, routing, Json, Router};
use formrelay_client::{
    form::FormData,
    submit::{
        Analytics, AnalyticsEvent, HttpSubmitClient, SubmissionContext, SubmitService,
        TokenProvider,
    },
};
use formrelay_models::contact::{FormType, Language};
use tokio::net::TcpListener;

#[derive(Debug, Clone, Default)]
struct Recorder {
    payloads: Arc<Mutex<Vec<serde_json::Value>>>,
    events: Arc<Mutex<Vec<AnalyticsEvent>>>,
}

impl Analytics for Recorder {
    fn try_notify(&self, event: &AnalyticsEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

struct StaticToken(&'static str);

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.into())
    }
}

fn form_data() -> FormData {
    FormData {
        first_name: "Kari".into(),
        last_name: "Nordmann".into(),
        email: "kari@acme.no".into(),
        company: "Acme AS".into(),
        message: "We would like a demo.".into(),
        form_type: FormType::Contact,
        language: Language::En,
        source: "pricing-page".into(),
        ..Default::default()
    }
}

async fn start_server(router: Router<()>) -> SocketAddr {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr) -> HttpSubmitClient {
    HttpSubmitClient::new(
        format!("http://{addr}/api/contact").parse().unwrap(),
    )
}

fn success_router(recorder: &Recorder) -> Router<()> {
    let payloads = Arc::clone(&recorder.payloads);
    Router::new().route(
        "/api/contact",
        routing::post(move |Json(payload): Json<serde_json::Value>| {
            payloads.lock().unwrap().push(payload);
            async {
                Json(
                    serde_json::json!({"success": true, "message": "Message sent successfully!"}),
                )
            }
        }),
    )
}

#[tokio::test]
async fn success() {
    let recorder = Recorder::default();
    let addr = start_server(success_router(&recorder)).await;

    let sut = client(addr).with_analytics(recorder.clone());

    let outcome = sut.submit(&form_data(), None).await;

    assert!(outcome.success);
    assert_eq!(outcome.message.as_deref(), Some("Message sent successfully!"));
    assert_eq!(outcome.error, None);

    let payloads = recorder.payloads.lock().unwrap().clone();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0]["firstName"], "Kari");
    assert_eq!(payloads[0]["email"], "kari@acme.no");
    assert_eq!(payloads[0]["formType"], "contact");
    assert_eq!(payloads[0]["language"], "en");
    assert_eq!(payloads[0]["source"], "pricing-page");
    assert!(payloads[0].get("turnstileToken").is_none());

    let events = recorder.events.lock().unwrap().clone();
    assert_eq!(
        events,
        [AnalyticsEvent::FormSubmitted {
            form_type: FormType::Contact,
            success: true
        }]
    );
}

#[tokio::test]
async fn attaches_anti_bot_token() {
    let recorder = Recorder::default();
    let addr = start_server(success_router(&recorder)).await;

    let sut = client(addr).with_token_provider(StaticToken("the-challenge-token"));

    let outcome = sut.submit(&form_data(), None).await;

    assert!(outcome.success);
    let payloads = recorder.payloads.lock().unwrap().clone();
    assert_eq!(payloads[0]["turnstileToken"], "the-challenge-token");
}

#[tokio::test]
async fn context_overrides_form_fields() {
    let recorder = Recorder::default();
    let addr = start_server(success_router(&recorder)).await;

    let context = SubmissionContext {
        source: Some("utm:spring-campaign".into()),
        segment: Some("enterprise".into()),
        ..Default::default()
    };

    let outcome = client(addr).submit(&form_data(), Some(&context)).await;

    assert!(outcome.success);
    let payloads = recorder.payloads.lock().unwrap().clone();
    assert_eq!(payloads[0]["source"], "utm:spring-campaign");
    assert_eq!(payloads[0]["segment"], "enterprise");
}

#[tokio::test]
async fn server_error_envelope() {
    let recorder = Recorder::default();
    let addr = start_server(Router::new().route(
        "/api/contact",
        routing::post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "error": "Message must be at least 10 characters long."
                })),
            )
        }),
    ))
    .await;

    let sut = client(addr).with_analytics(recorder.clone());

    let outcome = sut.submit(&form_data(), None).await;

    assert!(!outcome.success);
    assert_eq!(
        outcome.error.as_deref(),
        Some("Message must be at least 10 characters long.")
    );

    let events = recorder.events.lock().unwrap().clone();
    assert_eq!(
        events,
        [AnalyticsEvent::FormSubmitted {
            form_type: FormType::Contact,
            success: false
        }]
    );
}

#[tokio::test]
async fn rate_limit_envelope() {
    let addr = start_server(Router::new().route(
        "/api/contact",
        routing::post(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({
                    "success": false,
                    "error": "Too many requests. Please try again later."
                })),
            )
        }),
    ))
    .await;

    let outcome = client(addr).submit(&form_data(), None).await;

    assert!(!outcome.success);
    assert_eq!(
        outcome.error.as_deref(),
        Some("Too many requests. Please try again later.")
    );
}

#[tokio::test]
async fn non_json_response_is_an_opaque_error() {
    let addr = start_server(Router::new().route(
        "/api/contact",
        routing::post(|| async {
            (
                StatusCode::BAD_GATEWAY,
                axum::response::Html("<html>Bad gateway</html>"),
            )
                .into_response()
        }),
    ))
    .await;

    let outcome = client(addr).submit(&form_data(), None).await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("<html>Bad gateway</html>"));
}

#[tokio::test]
async fn network_error_maps_to_localized_generic_message() {
    // Bind and immediately drop to get a port nothing listens on.
    let addr = TcpListener::bind(("127.0.0.1", 0))
        .await
        .unwrap()
        .local_addr()
        .unwrap();

    let outcome = client(addr).submit(&form_data(), None).await;
    assert!(!outcome.success);
    assert_eq!(
        outcome.error.as_deref(),
        Some("Something went wrong. Please try again.")
    );

    let norwegian = FormData {
        language: Language::No,
        ..form_data()
    };
    let outcome = client(addr).submit(&norwegian, None).await;
    assert_eq!(
        outcome.error.as_deref(),
        Some("Noe gikk galt. Vennligst prøv igjen.")
    );
}
