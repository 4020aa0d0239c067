use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use formrelay_cache_contracts::KvStore;
use formrelay_core_health_contracts::{HealthService, HealthStatus};
use formrelay_di::Build;
use formrelay_email_contracts::EmailService;
use formrelay_shared_contracts::time::TimeService;
use tokio::sync::RwLock;
use tracing::error;

#[derive(Debug, Clone, Build)]
pub struct HealthServiceImpl<Time, Store, Email> {
    time: Time,
    store: Store,
    email: Email,
    config: HealthServiceConfig,
    #[state]
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct HealthServiceConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Default)]
struct State {
    cache: RwLock<Option<CachedStatus>>,
}

#[derive(Debug)]
struct CachedStatus {
    status: HealthStatus,
    timestamp: DateTime<Utc>,
}

impl<Time, Store, Email> HealthService for HealthServiceImpl<Time, Store, Email>
where
    Time: TimeService,
    Store: KvStore,
    Email: EmailService,
{
    async fn get_status(&self) -> HealthStatus {
        let now = self.time.now();
        let cache_guard = self.state.cache.read().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.timestamp + self.config.cache_ttl)
        {
            return cached.status;
        }
        drop(cache_guard);

        let mut cache_guard = self.state.cache.write().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.timestamp + self.config.cache_ttl)
        {
            return cached.status;
        }

        let cache = self
            .store
            .ping()
            .await
            .inspect_err(|err| error!("Failed to ping store: {err}"))
            .is_ok();

        let email = self
            .email
            .ping()
            .await
            .inspect_err(|err| error!("Failed to ping mail API: {err}"))
            .is_ok();

        let status = HealthStatus { cache, email };

        cache_guard
            .insert(CachedStatus {
                status,
                timestamp: now,
            })
            .status
    }
}
