use std::{future::Future, time::Duration};

use serde::{de::DeserializeOwned, Serialize};

/// Key-value store shared by the relay instances.
///
/// Both the rate-limit windows and the consumer-email log live here, always
/// with a TTL so records expire on their own.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait KvStore: Sized + Send + Sync + 'static {
    /// Reads an item.
    fn get<T: DeserializeOwned + std::fmt::Debug + 'static>(
        &self,
        key: &str,
    ) -> impl Future<Output = anyhow::Result<Option<T>>> + Send;

    /// Creates a new or updates an existing item.
    ///
    /// If `ttl` is set, the item is automatically removed after this timeout.
    fn put<T: Serialize + std::fmt::Debug + Sync + 'static>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Removes an existing item.
    ///
    /// Does nothing if the item does not exist.
    fn remove(&self, key: &str) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Verify the connection to the store.
    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[cfg(feature = "mock")]
impl MockKvStore {
    pub fn with_get<T: DeserializeOwned + std::fmt::Debug + Send + 'static>(
        mut self,
        key: String,
        result: Option<T>,
    ) -> Self {
        self.expect_get()
            .once()
            .with(mockall::predicate::eq(key))
            .return_once(|_| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_put<T: std::fmt::Debug + PartialEq + Serialize + Send + Sync + 'static>(
        mut self,
        key: String,
        value: T,
        ttl: Option<Duration>,
    ) -> Self {
        self.expect_put()
            .once()
            .with(
                mockall::predicate::eq(key),
                mockall::predicate::eq(value),
                mockall::predicate::eq(ttl),
            )
            .return_once(|_, _, _| Box::pin(std::future::ready(Ok(()))));
        self
    }

    pub fn with_remove(mut self, key: String) -> Self {
        self.expect_remove()
            .once()
            .with(mockall::predicate::eq(key))
            .return_once(|_| Box::pin(std::future::ready(Ok(()))));
        self
    }
}
