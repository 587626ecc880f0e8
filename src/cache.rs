//! Cache-store abstraction backed by Redis
//!
//! Every operation here is deliberately infallible from the caller's point
//! of view: a cache that is down must never fail a request that could still
//! be answered, so failures are logged and downgraded to miss / no-op.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;
use tracing::warn;

use crate::config::RedisConfig;

/// Key/value store with TTL used for query-result caching and session
/// transcript persistence
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str, ttl: Duration);
    async fn delete(&self, key: &str);
    /// Whether the backing store is currently reachable
    async fn ping(&self) -> bool;
}

/// Redis-backed cache.
///
/// Holds an `Option<redis::Client>` so that a failed connect leaves an
/// explicit disabled store instead of a handle that errors on every call.
pub struct RedisCache {
    client: Option<redis::Client>,
}

impl RedisCache {
    /// Connect to the store described by `config`.
    ///
    /// A bad URL yields a disabled cache rather than an error; the service
    /// must stay usable (without caching or session persistence) when the
    /// store is unavailable.
    pub fn connect(config: &RedisConfig) -> Self {
        let url = config.resolve_url();
        match redis::Client::open(url.as_str()) {
            Ok(client) => {
                debug!("Redis client configured for {url}");
                Self {
                    client: Some(client),
                }
            }
            Err(e) => {
                warn!("Redis unavailable ({e}); caching and session persistence disabled");
                Self { client: None }
            }
        }
    }

    /// A cache that drops every write and misses every read
    pub fn disabled() -> Self {
        Self { client: None }
    }

    async fn connection(&self) -> Option<redis::aio::MultiplexedConnection> {
        let client = self.client.as_ref()?;
        match client.get_multiplexed_tokio_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                warn!("Redis connection failed: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.connection().await?;
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Redis GET {key} failed: {e}");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        let result = redis::pipe()
            .set(key, value)
            .ignore()
            .expire(key, ttl.as_secs() as i64)
            .query_async::<_, ()>(&mut conn)
            .await;
        if let Err(e) = result {
            warn!("Redis SET/EXPIRE {key} failed: {e}");
        }
    }

    async fn delete(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        if let Err(e) = conn.del::<_, ()>(key).await {
            warn!("Redis DEL {key} failed: {e}");
        }
    }

    async fn ping(&self) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .is_ok()
    }
}
