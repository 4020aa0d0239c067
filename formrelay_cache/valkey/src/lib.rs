use std::{fmt::Debug, time::Duration};

use anyhow::Context;
use bb8_redis::{
    bb8::Pool,
    redis::{self, AsyncCommands},
    RedisConnectionManager,
};
use formrelay_cache_contracts::KvStore;
use serde::{de::DeserializeOwned, Serialize};

/// [`KvStore`] backed by a Valkey (or Redis) instance.
///
/// Values are serialized with MessagePack; TTLs map to `PSETEX` so expiry is
/// handled by the store itself.
#[derive(Debug, Clone)]
pub struct ValkeyStore {
    pool: Pool<RedisConnectionManager>,
}

#[derive(Debug)]
pub struct ValkeyStoreConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

impl ValkeyStore {
    pub async fn connect(config: &ValkeyStoreConfig) -> anyhow::Result<Self> {
        let manager = RedisConnectionManager::new(config.url.as_str())?;
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .min_idle(config.min_connections)
            .connection_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .build(manager)
            .await?;

        Ok(Self { pool })
    }

    /// Removes all keys. Only used by tests.
    pub async fn clear(&self) -> anyhow::Result<()> {
        let mut conn = self
            .pool
            .get()
            .await
            .context("Failed to acquire store connection")?;
        redis::cmd("FLUSHDB")
            .exec_async(&mut *conn)
            .await
            .context("Failed to execute FLUSHDB command")
    }
}

impl KvStore for ValkeyStore {
    async fn get<T: DeserializeOwned + Debug + 'static>(
        &self,
        key: &str,
    ) -> anyhow::Result<Option<T>> {
        let mut conn = self
            .pool
            .get()
            .await
            .context("Failed to acquire store connection")?;

        let result = conn
            .get::<_, Option<Vec<u8>>>(key)
            .await
            .context("Failed to read value from store")?;

        result
            .map(|data| rmp_serde::from_slice(&data))
            .transpose()
            .context("Failed to deserialize stored value")
    }

    async fn put<T: Serialize + Debug + Sync + 'static>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> anyhow::Result<()> {
        let value = rmp_serde::to_vec(&value).context("Failed to serialize value")?;

        let mut conn = self
            .pool
            .get()
            .await
            .context("Failed to acquire store connection")?;

        if let Some(ttl) = ttl {
            conn.pset_ex(key, value, ttl.as_millis().try_into()?).await
        } else {
            conn.set(key, value).await
        }
        .context("Failed to write value to store")
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut conn = self
            .pool
            .get()
            .await
            .context("Failed to acquire store connection")?;

        conn.del(key)
            .await
            .context("Failed to remove item from store")
    }

    async fn ping(&self) -> anyhow::Result<()> {
        let mut conn = self
            .pool
            .get()
            .await
            .context("Failed to acquire store connection")?;

        redis::cmd("PING")
            .exec_async(&mut *conn)
            .await
            .context("Failed to ping store")
    }
}
