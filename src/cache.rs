//! String-keyed store for ephemeral state.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

pub type SharedCache = Arc<dyn Cache>;

#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>>;

    /// Stores `value` under `key`. With a `ttl` the entry disappears once it elapses.
    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> anyhow::Result<()>;

    async fn delete(&self, key: &str) -> anyhow::Result<()>;

    async fn clear(&self) -> anyhow::Result<()>;
}

struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// In-process [`Cache`]. Expired entries are dropped lazily on access.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> anyhow::Result<()> {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.entries
            .write()
            .await
            .insert(key.to_owned(), Entry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

/// [`Cache`] on a Redis server, so several lobby processes see the same
/// room state. Keys live under a namespace so `clear` leaves other data alone.
pub struct RedisCache {
    connection: ConnectionManager,
    namespace: String,
}

impl RedisCache {
    pub async fn connect(redis_url: &str, namespace: &str) -> anyhow::Result<Self> {
        let client = Client::open(redis_url)?;
        let connection = client.get_connection_manager().await?;
        info!("room cache on redis, keys under {namespace}:");

        Ok(Self {
            connection,
            namespace: namespace.to_owned(),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{key}", self.namespace)
    }
}

/// Whole seconds for `SET ... EX`, rounded up and never zero.
fn expire_secs(ttl: Duration) -> u64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    secs.max(1)
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection.get(self.key(key)).await?;
        Ok(raw.map(|raw| serde_json::from_str(&raw)).transpose()?)
    }

    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> anyhow::Result<()> {
        let mut connection = self.connection.clone();
        let raw = serde_json::to_string(&value)?;
        match ttl {
            Some(ttl) => {
                let () = connection.set_ex(self.key(key), raw, expire_secs(ttl)).await?;
            }
            None => {
                let () = connection.set(self.key(key), raw).await?;
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        let mut connection = self.connection.clone();
        let () = connection.del(self.key(key)).await?;
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        let mut connection = self.connection.clone();
        let keys: Vec<String> = connection.keys(self.key("*")).await?;
        if !keys.is_empty() {
            let () = connection.del(keys).await?;
        }
        Ok(())
    }
}
