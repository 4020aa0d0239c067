use std::{net::IpAddr, time::Duration};

use anyhow::Context;
use formrelay_cache_contracts::KvStore;
use formrelay_core_contact_contracts::rate_limit::{ContactRateLimitService, RateLimitError};
use formrelay_di::Build;
use formrelay_shared_contracts::time::TimeService;

/// Approximate sliding-window rate limiting backed by the external TTL store.
///
/// The window is a read-modify-write cycle without any atomicity: two
/// near-simultaneous requests from the same client can both read the same
/// window contents before either writes back, under-counting by at most one
/// request per race. This is an accepted approximation; switching to a
/// store-native atomic counter would make it strict.
#[derive(Debug, Clone, Build)]
pub struct ContactRateLimitServiceImpl<Time, Store> {
    time: Time,
    store: Store,
    config: ContactRateLimitConfig,
}

#[derive(Debug, Clone)]
pub struct ContactRateLimitConfig {
    pub window: Duration,
    pub max_requests: u64,
}

impl<Time, Store> ContactRateLimitService for ContactRateLimitServiceImpl<Time, Store>
where
    Time: TimeService,
    Store: KvStore,
{
    async fn check(&self, client_ip: IpAddr) -> Result<(), RateLimitError> {
        let key = cache_key(client_ip);
        let now = self.time.now();
        let cutoff = (now - self.config.window).timestamp_millis();

        let mut timestamps = self
            .store
            .get::<Vec<i64>>(&key)
            .await
            .context("Failed to read rate limit window from store")?
            .unwrap_or_default();

        // Requests older than the window never count toward the limit.
        timestamps.retain(|&timestamp| timestamp > cutoff);

        if timestamps.len() as u64 >= self.config.max_requests {
            return Err(RateLimitError::Exceeded);
        }

        timestamps.push(now.timestamp_millis());

        // The record expires with the window, so idle clients clean up after
        // themselves.
        self.store
            .put(&key, &timestamps, Some(self.config.window))
            .await
            .context("Failed to write rate limit window to store")?;

        Ok(())
    }
}

fn cache_key(client_ip: IpAddr) -> String {
    format!("contact_rate_limit:{client_ip}")
}
