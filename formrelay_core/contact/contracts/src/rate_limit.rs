use std::{future::Future, net::IpAddr};

use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactRateLimitService: Send + Sync + 'static {
    /// Counts a request from `client_ip` against its sliding window.
    ///
    /// Returns an error if the window already contains the maximum number of
    /// requests; rejected requests are not counted.
    fn check(&self, client_ip: IpAddr) -> impl Future<Output = Result<(), RateLimitError>> + Send;
}

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("Rate limit exceeded.")]
    Exceeded,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactRateLimitService {
    pub fn with_check(mut self, client_ip: IpAddr, result: Result<(), RateLimitError>) -> Self {
        self.expect_check()
            .once()
            .with(mockall::predicate::eq(client_ip))
            .return_once(|_| Box::pin(std::future::ready(result)));
        self
    }
}
