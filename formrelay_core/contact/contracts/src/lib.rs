use std::{future::Future, net::IpAddr};

use formrelay_models::contact::{ContactRequest, ContactValidationError};
use thiserror::Error;

pub mod consumer_log;
pub mod rate_limit;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Relays a contact form submission to the configured mailbox.
    ///
    /// The request is counted against the client's rate-limit window before
    /// anything else happens, including payload validation.
    fn submit(
        &self,
        client_ip: IpAddr,
        request: ContactRequest,
    ) -> impl Future<Output = Result<(), ContactSubmitError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("Too many requests. Please try again later.")]
    RateLimited,
    #[error(transparent)]
    Validation(#[from] ContactValidationError),
    #[error("Captcha check failed.")]
    Captcha,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactService {
    pub fn with_submit(
        mut self,
        client_ip: IpAddr,
        request: ContactRequest,
        result: Result<(), ContactSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(
                mockall::predicate::eq(client_ip),
                mockall::predicate::eq(request),
            )
            .return_once(|_, _| Box::pin(std::future::ready(result)));
        self
    }
}
