use std::time::Duration;

use anyhow::Context;
use email_address::EmailAddress;
use formrelay_cache_contracts::KvStore;
use formrelay_core_contact_contracts::consumer_log::ContactConsumerLogService;
use formrelay_di::Build;
use formrelay_shared_contracts::time::TimeService;

/// Keeps a record per consumer email address that recently submitted the
/// contact form. Entries expire with the retention window and are only read
/// by downstream analysis, never by the relay itself.
#[derive(Debug, Clone, Build)]
pub struct ContactConsumerLogServiceImpl<Time, Store> {
    time: Time,
    store: Store,
    config: ContactConsumerLogConfig,
}

#[derive(Debug, Clone)]
pub struct ContactConsumerLogConfig {
    pub retention: Duration,
}

impl<Time, Store> ContactConsumerLogService for ContactConsumerLogServiceImpl<Time, Store>
where
    Time: TimeService,
    Store: KvStore,
{
    async fn record(&self, email: &EmailAddress) -> anyhow::Result<()> {
        let key = format!("consumer_email_log:{email}");
        let timestamp = self.time.now().timestamp_millis();

        self.store
            .put(&key, &timestamp, Some(self.config.retention))
            .await
            .context("Failed to write consumer email log entry")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use formrelay_cache_contracts::MockKvStore;
    use formrelay_shared_contracts::time::MockTimeService;

    use super::*;

    #[tokio::test]
    async fn record() {
        // Arrange
        let now = Utc.with_ymd_and_hms(2024, 10, 5, 12, 0, 0).unwrap();
        let retention = Duration::from_secs(30 * 24 * 3600);

        let time = MockTimeService::new().with_now(now);
        let store = MockKvStore::new().with_put(
            "consumer_email_log:jo@gmail.com".into(),
            now.timestamp_millis(),
            Some(retention),
        );

        let sut = ContactConsumerLogServiceImpl {
            time,
            store,
            config: ContactConsumerLogConfig { retention },
        };

        // Act
        let result = sut.record(&"jo@gmail.com".parse().unwrap()).await;

        // Assert
        result.unwrap();
    }
}
