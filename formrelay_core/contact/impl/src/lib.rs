use std::{net::IpAddr, sync::Arc};

use email_address::EmailAddress;
use formrelay_core_contact_contracts::{
    consumer_log::ContactConsumerLogService,
    rate_limit::{ContactRateLimitService, RateLimitError},
    ContactService, ContactSubmitError,
};
use formrelay_di::Build;
use formrelay_email_contracts::{ContentType, Email, EmailService};
use formrelay_models::{contact::ContactRequest, email_domain::is_consumer_domain};
use formrelay_shared_contracts::captcha::{CaptchaCheckError, CaptchaService};
use formrelay_utils::Apply;
use tracing::warn;

pub mod consumer_log;
pub mod rate_limit;

const DEFAULT_SUBJECT: &str = "New contact form submission";

#[derive(Debug, Clone, Build)]
pub struct ContactServiceImpl<RateLimit, Captcha, EmailS, ConsumerLog> {
    rate_limit: RateLimit,
    captcha: Captcha,
    email: EmailS,
    consumer_log: ConsumerLog,
    config: ContactServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    /// Mailbox submissions are relayed to.
    pub recipient: Arc<EmailAddress>,
}

impl<RateLimit, Captcha, EmailS, ConsumerLog> ContactService
    for ContactServiceImpl<RateLimit, Captcha, EmailS, ConsumerLog>
where
    RateLimit: ContactRateLimitService,
    Captcha: CaptchaService,
    EmailS: EmailService,
    ConsumerLog: ContactConsumerLogService,
{
    async fn submit(
        &self,
        client_ip: IpAddr,
        request: ContactRequest,
    ) -> Result<(), ContactSubmitError> {
        self.rate_limit
            .check(client_ip)
            .await
            .map_err(|err| match err {
                RateLimitError::Exceeded => ContactSubmitError::RateLimited,
                RateLimitError::Other(err) => err.into(),
            })?;

        let submission = request.validate()?;

        self.captcha
            .check(request.turnstile_token.as_deref())
            .await
            .map_err(|err| match err {
                CaptchaCheckError::Failed => ContactSubmitError::Captcha,
                CaptchaCheckError::Other(err) => err.into(),
            })?;

        let subject = submission
            .subject
            .as_ref()
            .map(|subject| format!("[Contact Form] {}", **subject))
            .unwrap_or_else(|| format!("[Contact Form] {DEFAULT_SUBJECT}"));

        let body = format!("Name: {}\nEmail: {}\n", *submission.name, submission.email)
            .apply_map(submission.company.as_ref(), |body, company| {
                body + &format!("Company: {}\n", **company)
            })
            + &format!("\nMessage:\n{}", *submission.message);

        let email = Email {
            recipient: (*self.config.recipient).clone(),
            subject,
            body,
            content_type: ContentType::Text,
            reply_to: Some(submission.email.clone()),
        };

        self.email.send(email).await?;

        // Abuse tracking only, must never fail the request.
        if is_consumer_domain(submission.email.domain()) {
            if let Err(err) = self.consumer_log.record(&submission.email).await {
                warn!("Failed to record consumer email submission: {err:#}");
            }
        }

        Ok(())
    }
}
