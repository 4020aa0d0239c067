use std::{collections::HashMap, future::Future};

use formrelay_models::contact::{FormType, Language};
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::{form::FormData, validate::generic_error_message};

/// Performs the actual submission of a completed form.
#[cfg_attr(test, mockall::automock)]
pub trait SubmitService: Send + Sync {
    fn submit<'a, 'b>(
        &self,
        data: &'a FormData,
        context: Option<&'b SubmissionContext>,
    ) -> impl Future<Output = SubmitOutcome> + Send;
}

/// Page metadata merged into the payload at submit time (UTM parameters and
/// similar); values here take precedence over the form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionContext {
    pub source: Option<String>,
    pub segment: Option<String>,
    pub urgency: Option<String>,
    pub request_type: Option<String>,
    pub employee_count: Option<String>,
}

/// Result of a submission attempt. Never an error: all failure modes are
/// folded into `success == false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
    pub validation_errors: HashMap<String, String>,
}

impl SubmitOutcome {
    fn succeeded(message: Option<String>) -> Self {
        Self {
            success: true,
            message,
            ..Default::default()
        }
    }

    fn failed(error: String) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }
}

/// Provides the anti-bot token attached to submissions.
///
/// Token discovery is best-effort; returning `None` is not an error. The unit
/// implementation never has a token.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

impl TokenProvider for () {
    fn token(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsEvent {
    FormSubmitted { form_type: FormType, success: bool },
}

/// Fire-and-forget event sink. Implementations swallow their own errors and
/// must never panic; the unit implementation discards all events.
pub trait Analytics: Send + Sync {
    fn try_notify(&self, event: &AnalyticsEvent);
}

impl Analytics for () {
    fn try_notify(&self, _event: &AnalyticsEvent) {}
}

/// [`Analytics`] sink that emits events to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnalytics;

impl Analytics for TracingAnalytics {
    fn try_notify(&self, event: &AnalyticsEvent) {
        debug!(?event, "analytics event");
    }
}

/// HTTP client for the relay endpoint.
///
/// A single POST per submission, no retries. Network failures and unexpected
/// server output are both folded into a failed [`SubmitOutcome`] so callers
/// never have to handle errors out of band.
#[derive(Debug, Clone)]
pub struct HttpSubmitClient<Tokens = (), Events = ()> {
    http: reqwest::Client,
    endpoint: Url,
    token_provider: Tokens,
    analytics: Events,
}

impl HttpSubmitClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            token_provider: (),
            analytics: (),
        }
    }
}

impl<Tokens, Events> HttpSubmitClient<Tokens, Events> {
    pub fn with_token_provider<T: TokenProvider>(self, token_provider: T) -> HttpSubmitClient<T, Events> {
        HttpSubmitClient {
            http: self.http,
            endpoint: self.endpoint,
            token_provider,
            analytics: self.analytics,
        }
    }

    pub fn with_analytics<E: Analytics>(self, analytics: E) -> HttpSubmitClient<Tokens, E> {
        HttpSubmitClient {
            http: self.http,
            endpoint: self.endpoint,
            token_provider: self.token_provider,
            analytics,
        }
    }
}

impl<Tokens, Events> SubmitService for HttpSubmitClient<Tokens, Events>
where
    Tokens: TokenProvider,
    Events: Analytics,
{
    async fn submit(&self, data: &FormData, context: Option<&SubmissionContext>) -> SubmitOutcome {
        let payload = SubmitPayload::new(data, context, self.token_provider.token());

        let outcome = match self.perform(&payload).await {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!("contact submission failed on the network level: {err}");
                SubmitOutcome::failed(generic_error_message(data.language).into())
            }
        };

        self.analytics.try_notify(&AnalyticsEvent::FormSubmitted {
            form_type: data.form_type,
            success: outcome.success,
        });

        outcome
    }
}

impl<Tokens, Events> HttpSubmitClient<Tokens, Events> {
    async fn perform(&self, payload: &SubmitPayload<'_>) -> Result<SubmitOutcome, reqwest::Error> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|x| x.to_str().ok())
            .is_some_and(|x| x.starts_with("application/json"));

        if !is_json {
            // Unexpected server or proxy output (e.g. an HTML error page):
            // treat the body as an opaque error message.
            let body = response.text().await.unwrap_or_default();
            let error = if body.trim().is_empty() {
                format!("Request failed with status {status}")
            } else {
                body
            };
            return Ok(SubmitOutcome::failed(error));
        }

        let envelope = match response.json::<ResponseEnvelope>().await {
            Ok(envelope) => envelope,
            Err(err) => {
                debug!("failed to decode response envelope: {err}");
                return Ok(SubmitOutcome::failed(format!(
                    "Request failed with status {status}"
                )));
            }
        };

        if status.is_success() && envelope.success {
            return Ok(SubmitOutcome::succeeded(envelope.message));
        }

        Ok(SubmitOutcome {
            success: false,
            message: None,
            error: Some(
                envelope
                    .error
                    .unwrap_or_else(|| format!("Request failed with status {status}")),
            ),
            validation_errors: envelope.validation_errors.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseEnvelope {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    error: Option<String>,
    validation_errors: Option<HashMap<String, String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitPayload<'a> {
    first_name: &'a str,
    last_name: &'a str,
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    company: &'a str,
    job_title: &'a str,
    message: &'a str,
    subject: &'a str,
    form_type: FormType,
    language: Language,
    request_type: &'a str,
    urgency: &'a str,
    segment: &'a str,
    employee_count: &'a str,
    honeypot: &'a str,
    source: &'a str,
    timestamp: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    turnstile_token: Option<String>,
}

impl<'a> SubmitPayload<'a> {
    fn new(
        data: &'a FormData,
        context: Option<&'a SubmissionContext>,
        turnstile_token: Option<String>,
    ) -> Self {
        let ctx = |field: fn(&SubmissionContext) -> &Option<String>, fallback: &'a str| {
            context
                .and_then(|x| field(x).as_deref())
                .unwrap_or(fallback)
        };

        Self {
            first_name: &data.first_name,
            last_name: &data.last_name,
            name: &data.name,
            email: &data.email,
            phone: &data.phone,
            company: &data.company,
            job_title: &data.job_title,
            message: &data.message,
            subject: &data.subject,
            form_type: data.form_type,
            language: data.language,
            request_type: ctx(|x| &x.request_type, &data.request_type),
            urgency: ctx(|x| &x.urgency, &data.urgency),
            segment: ctx(|x| &x.segment, &data.segment),
            employee_count: ctx(|x| &x.employee_count, &data.employee_count),
            honeypot: &data.honeypot,
            source: ctx(|x| &x.source, &data.source),
            timestamp: &data.timestamp,
            turnstile_token,
        }
    }
}
