use std::future::Future;

use email_address::EmailAddress;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactConsumerLogService: Send + Sync + 'static {
    /// Records a successfully relayed submission from a consumer email
    /// address for later abuse analysis.
    fn record(&self, email: &EmailAddress) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[cfg(feature = "mock")]
impl MockContactConsumerLogService {
    pub fn with_record(mut self, email: EmailAddress, result: anyhow::Result<()>) -> Self {
        self.expect_record()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(|_| Box::pin(std::future::ready(result)));
        self
    }
}
